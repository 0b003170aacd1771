//! Lobby-debug dump grammars.
//!
//! The dump is a header line followed by one row per seated/pending member.
//! The header's lobby id is the match boundary: a new id means scores and
//! membership from the previous match are stale.

use std::sync::LazyLock;

use regex::Regex;

use super::{decode_field, LineMatcher};
use crate::error::ParseError;
use crate::event::{ConsoleLine, LobbyMember, LobbyMemberKind, PlayerId, Team};

static LOBBY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CTFLobbyShared: ID:([0-9a-fA-F]{16})\s+(\d+) member\(s\), (\d+) pending$")
        .expect("static pattern")
});

/// `CTFLobbyShared: ID:000221f6e44e95d1  24 member(s), 0 pending`
pub struct LobbyHeaderMatcher;

impl LineMatcher for LobbyHeaderMatcher {
    fn name(&self) -> &'static str {
        "lobby-header"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = LOBBY_HEADER.captures(text) else {
            return Ok(None);
        };

        let lobby_id = u64::from_str_radix(&caps[1], 16).map_err(|_| ParseError::InvalidNumber {
            grammar: self.name(),
            field: "lobby_id",
            value: caps[1].to_string(),
        })?;

        Ok(Some(ConsoleLine::LobbyHeader {
            lobby_id,
            member_count: decode_field(self.name(), "member_count", &caps[2])?,
            pending_count: decode_field(self.name(), "pending_count", &caps[3])?,
        }))
    }
}

static LOBBY_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(Member|Pending)\[(\d+)\] \[U:(\d+):(\d+)\]\s+team = (\w+)\s+type = (\w+)$")
        .expect("static pattern")
});

/// `  Member[7] [U:1:12345678]  team = TF_GC_TEAM_INVADERS  type = MATCH_PLAYER`
pub struct LobbyMemberMatcher;

impl LineMatcher for LobbyMemberMatcher {
    fn name(&self) -> &'static str {
        "lobby-member"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = LOBBY_MEMBER.captures(text) else {
            return Ok(None);
        };

        let kind = match &caps[1] {
            "Pending" => LobbyMemberKind::Pending,
            _ => LobbyMemberKind::Member,
        };
        let account_id: u32 = decode_field(self.name(), "account_id", &caps[4])?;
        let team = Team::from_lobby_token(&caps[5])?;

        Ok(Some(ConsoleLine::LobbyMember(LobbyMember {
            kind,
            index: decode_field(self.name(), "index", &caps[2])?,
            player: PlayerId::from_account_id(account_id),
            team,
            member_type: caps[6].to_string(),
        })))
    }
}
