//! Typed console events.
//!
//! [`ConsoleLine`] is a closed sum type over every line kind the parser
//! understands, plus an explicit `Unrecognized` catch-all. Keeping the
//! hierarchy closed means downstream dispatch is exhaustive and checked by
//! the compiler rather than by convention.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Steam3 individual accounts live in universe 1, type 1; the 64-bit form is
/// this constant plus the 32-bit account id.
const STEAM64_INDIVIDUAL_BASE: u64 = 0x0110_0001_0000_0000;

/// Stable 64-bit player identity.
///
/// This is the canonical key for all player state and mark lists. Display
/// names are mutable and collide; once an identity is known it must be used
/// instead of the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Build an identity from a Steam3 `[U:1:NNNN]` account id.
    pub fn from_account_id(account_id: u32) -> Self {
        Self(STEAM64_INDIVIDUAL_BASE + u64::from(account_id))
    }

    /// The 32-bit account id portion.
    pub fn account_id(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[U:1:{}]", self.account_id())
    }
}

/// Socket a split packet arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketType {
    Client,
    Server,
    Hltv,
    Matchmaking,
    SystemLink,
    Lan,
}

impl SocketType {
    /// Decode the three-character console token.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "cl " => Ok(Self::Client),
            "sv " => Ok(Self::Server),
            "htv" => Ok(Self::Hltv),
            "mat" => Ok(Self::Matchmaking),
            "lnk" => Ok(Self::SystemLink),
            "lan" => Ok(Self::Lan),
            other => Err(ParseError::UnknownSocketType {
                token: other.to_string(),
            }),
        }
    }

    /// The three-character console token (padded, exactly as printed).
    pub fn token(self) -> &'static str {
        match self {
            Self::Client => "cl ",
            Self::Server => "sv ",
            Self::Hltv => "htv",
            Self::Matchmaking => "mat",
            Self::SystemLink => "lnk",
            Self::Lan => "lan",
        }
    }
}

/// Team assignment as reported by the lobby subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// Decode a lobby team token.
    pub fn from_lobby_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "TF_GC_TEAM_DEFENDERS" => Ok(Self::Red),
            "TF_GC_TEAM_INVADERS" => Ok(Self::Blue),
            other => Err(ParseError::UnknownTeam {
                token: other.to_string(),
            }),
        }
    }
}

/// Lifecycle state from a status-dump row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Active,
    Spawning,
    Connecting,
    Challenging,
}

impl PlayerState {
    /// Decode a status-line state token.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token {
            "active" => Ok(Self::Active),
            "spawning" => Ok(Self::Spawning),
            "connecting" => Ok(Self::Connecting),
            "challenging" => Ok(Self::Challenging),
            other => Err(ParseError::UnknownPlayerState {
                token: other.to_string(),
            }),
        }
    }
}

/// A decoded split-packet diagnostic.
///
/// The fragment index is 1-based on the wire and 0-based here. `total_size`
/// is accumulated by the receiver, not carried on the line, so re-encoding
/// appends it as an extra bracketed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPacket {
    pub socket: SocketType,
    /// 0-based fragment index.
    pub index: u32,
    pub count: u32,
    pub sequence: u32,
    pub size: u32,
    pub mtu: u32,
    pub total_size: u32,
    pub address: String,
}

impl fmt::Display for SplitPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<-- [{}] Split packet{:>4}/{:>4} seq {:>5} size {:>4} mtu {:>4} from {} [ total {:>4} ]",
            self.socket.token(),
            self.index + 1,
            self.count,
            self.sequence,
            self.size,
            self.mtu,
            self.address,
            self.total_size,
        )
    }
}

/// Whether a lobby row is a seated member or still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyMemberKind {
    Member,
    Pending,
}

/// One row of a lobby-debug dump: identity plus team association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyMember {
    pub kind: LobbyMemberKind,
    /// Lobby slot index; doubles as the client index for display mapping.
    pub index: u32,
    pub player: PlayerId,
    pub team: Team,
    /// Member type token as printed (e.g. `MATCH_PLAYER`), not enumerated.
    pub member_type: String,
}

/// One row of a `status` dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Server-assigned userid, reused across reconnects.
    pub user_id: u16,
    pub name: String,
    pub player: PlayerId,
    pub connected: Duration,
    pub ping_ms: u32,
    pub loss: u32,
    pub state: PlayerState,
}

/// A kill-feed line. Name-keyed: identities are not carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillNotification {
    pub killer: String,
    pub victim: String,
    pub weapon: String,
    pub crit: bool,
}

/// An in-game chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: String,
    pub text: String,
    pub dead: bool,
    pub team_chat: bool,
}

/// Every console line kind the parser recognizes.
///
/// Deliberately a closed enum: adding a variant is a breaking change that
/// surfaces as a compile error at every dispatch site, which is the point.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleLine {
    /// Split-packet diagnostic from the network layer.
    SplitPacket(SplitPacket),
    /// Net-channel latency and loss fraction.
    NetLatencyLoss { latency: f32, loss: f32 },
    /// Net-channel packet rate, packets per second.
    NetPacketRate { inbound: f32, outbound: f32 },
    /// Net-channel choke counters.
    NetChoke { inbound: f32, outbound: f32 },
    /// Net-channel flow, kB/s.
    NetFlow { inbound_kbps: f32, outbound_kbps: f32 },
    /// Net-channel lifetime totals, MB.
    NetChannelTotal { inbound_mb: f32, outbound_mb: f32 },
    /// `net_status` match-wide packet rate.
    NetTotalPackets { inbound: f32, outbound: f32 },
    /// `net_status` per-client packet rate.
    NetPerClientPackets { inbound: f32, outbound: f32 },
    /// `net_status` match-wide data rate, kB/s.
    NetTotalData { inbound_kbps: f32, outbound_kbps: f32 },
    /// `net_status` per-client data rate, kB/s.
    NetPerClientData { inbound_kbps: f32, outbound_kbps: f32 },
    /// Lobby-debug header; a changed lobby id marks a new match.
    LobbyHeader {
        lobby_id: u64,
        member_count: u32,
        pending_count: u32,
    },
    /// Lobby-debug member row.
    LobbyMember(LobbyMember),
    /// `status` dump row.
    Status(StatusSnapshot),
    /// Kill-feed line.
    Kill(KillNotification),
    /// Chat line.
    Chat(ChatMessage),
    /// No registered grammar matched. Most log output lands here.
    Unrecognized,
}

/// A parsed line paired with the timestamp it was ingested at.
///
/// Immutable once constructed; timestamps are supplied by the caller and
/// assumed non-decreasing across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleEvent {
    pub timestamp: DateTime<Utc>,
    pub line: ConsoleLine,
}
