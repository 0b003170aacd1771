//! Player state tracking.
//!
//! The tracker owns the canonical `PlayerId -> PlayerRecord` mapping and
//! reconciles partial updates from sources that each own a disjoint subset of
//! fields: lobby dumps carry team and slot, status rows carry name, userid,
//! ping and lifecycle state, the kill feed carries score deltas. A later
//! update never clears a field it carries no information for; where two
//! sources do overlap (team), the most recent write wins per field.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use warden_console::{ConsoleLine, LobbyMember, PlayerId, PlayerState, StatusSnapshot, Team};

/// Kill/death counters. Monotonically non-decreasing within a match; reset
/// on lobby change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerScores {
    pub kills: u16,
    pub deaths: u16,
}

/// Merged per-identity record. Exists only while the identity is believed
/// present in the match.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub name: Option<String>,
    pub user_id: Option<u16>,
    /// Lobby slot index, used for display line mapping.
    pub client_index: Option<u8>,
    pub team: Option<Team>,
    pub ping_ms: Option<u32>,
    pub loss: Option<u32>,
    pub state: Option<PlayerState>,
    pub scores: PlayerScores,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl PlayerRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            name: None,
            user_id: None,
            client_index: None,
            team: None,
            ping_ms: None,
            loss: None,
            state: None,
            scores: PlayerScores::default(),
            first_seen: now,
            last_seen: now,
        }
    }
}

/// Match-wide network figures. Each field refreshes on its own event cadence
/// and otherwise retains the last known value; there is no decay.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkHealth {
    pub latency: Option<f32>,
    pub loss: Option<f32>,
    pub packets_in_per_sec: Option<f32>,
    pub packets_out_per_sec: Option<f32>,
    pub choke_in: Option<f32>,
    pub choke_out: Option<f32>,
    pub flow_in_kbps: Option<f32>,
    pub flow_out_kbps: Option<f32>,
}

/// Result of a name-keyed identity lookup.
///
/// Display names are mutable and non-unique; callers must tolerate the
/// none-or-multiple cases rather than have a first match silently picked
/// for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLookup {
    /// No connected player carries this name.
    None,
    /// Exactly one match.
    One(PlayerId),
    /// Two or more connected players currently share this name.
    Ambiguous(Vec<PlayerId>),
}

/// Canonical `PlayerId -> PlayerRecord` store plus match-wide network health.
#[derive(Debug, Default)]
pub struct PlayerTracker {
    players: HashMap<PlayerId, PlayerRecord>,
    lobby_id: Option<u64>,
    net: NetworkHealth,
}

impl PlayerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the lobby id from a lobby-debug header. Returns `true` when
    /// the id differs from the current one, in which case all per-match state
    /// (membership, scores) is dropped.
    pub fn begin_lobby(&mut self, lobby_id: u64) -> bool {
        if self.lobby_id == Some(lobby_id) {
            return false;
        }
        self.lobby_id = Some(lobby_id);
        self.players.clear();
        self.net = NetworkHealth::default();
        true
    }

    /// Merge a lobby-debug member row: team and slot index.
    pub fn upsert_from_lobby(&mut self, member: &LobbyMember, now: DateTime<Utc>) {
        let record = self
            .players
            .entry(member.player)
            .or_insert_with(|| PlayerRecord::new(now));
        record.team = Some(member.team);
        record.client_index = Some(member.index.min(u8::MAX as u32) as u8);
        record.last_seen = now;
    }

    /// Merge a status row: name, userid, ping, loss, lifecycle state.
    pub fn upsert_from_status(&mut self, snap: &StatusSnapshot, now: DateTime<Utc>) {
        let record = self
            .players
            .entry(snap.player)
            .or_insert_with(|| PlayerRecord::new(now));
        record.name = Some(snap.name.clone());
        record.user_id = Some(snap.user_id);
        record.ping_ms = Some(snap.ping_ms);
        record.loss = Some(snap.loss);
        record.state = Some(snap.state);
        record.last_seen = now;
    }

    /// Apply a score delta. Counters only ever increase within a match.
    pub fn apply_score_delta(&mut self, player: PlayerId, kills: u16, deaths: u16) {
        if let Some(record) = self.players.get_mut(&player) {
            record.scores.kills = record.scores.kills.saturating_add(kills);
            record.scores.deaths = record.scores.deaths.saturating_add(deaths);
        }
    }

    /// Fold a network diagnostic line into the match-wide figures. Lines that
    /// carry no network data are ignored.
    pub fn apply_net(&mut self, line: &ConsoleLine) {
        match *line {
            ConsoleLine::NetLatencyLoss { latency, loss } => {
                self.net.latency = Some(latency);
                self.net.loss = Some(loss);
            }
            ConsoleLine::NetPacketRate { inbound, outbound }
            | ConsoleLine::NetTotalPackets { inbound, outbound } => {
                self.net.packets_in_per_sec = Some(inbound);
                self.net.packets_out_per_sec = Some(outbound);
            }
            ConsoleLine::NetChoke { inbound, outbound } => {
                self.net.choke_in = Some(inbound);
                self.net.choke_out = Some(outbound);
            }
            ConsoleLine::NetFlow {
                inbound_kbps,
                outbound_kbps,
            }
            | ConsoleLine::NetTotalData {
                inbound_kbps,
                outbound_kbps,
            } => {
                self.net.flow_in_kbps = Some(inbound_kbps);
                self.net.flow_out_kbps = Some(outbound_kbps);
            }
            ConsoleLine::NetChannelTotal { .. }
            | ConsoleLine::NetPerClientPackets { .. }
            | ConsoleLine::NetPerClientData { .. }
            | ConsoleLine::SplitPacket(_)
            | ConsoleLine::LobbyHeader { .. }
            | ConsoleLine::LobbyMember(_)
            | ConsoleLine::Status(_)
            | ConsoleLine::Kill(_)
            | ConsoleLine::Chat(_)
            | ConsoleLine::Unrecognized => {}
        }
    }

    /// Drop an identity that left the match.
    pub fn remove(&mut self, player: PlayerId) -> Option<PlayerRecord> {
        self.players.remove(&player)
    }

    pub fn team_of(&self, player: PlayerId) -> Option<Team> {
        self.players.get(&player).and_then(|r| r.team)
    }

    pub fn scores_of(&self, player: PlayerId) -> Option<PlayerScores> {
        self.players.get(&player).map(|r| r.scores)
    }

    pub fn user_id_for(&self, player: PlayerId) -> Option<u16> {
        self.players.get(&player).and_then(|r| r.user_id)
    }

    pub fn record(&self, player: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(&player)
    }

    /// Best-effort reverse lookup from a display name.
    pub fn identity_for_name(&self, name: &str) -> NameLookup {
        let mut hits: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(_, r)| r.name.as_deref() == Some(name))
            .map(|(&id, _)| id)
            .collect();
        match hits.len() {
            0 => NameLookup::None,
            1 => NameLookup::One(hits[0]),
            _ => {
                hits.sort_unstable();
                NameLookup::Ambiguous(hits)
            }
        }
    }

    pub fn network_health(&self) -> NetworkHealth {
        self.net
    }

    pub fn lobby_id(&self) -> Option<u64> {
        self.lobby_id
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &PlayerRecord)> {
        self.players.iter().map(|(&id, r)| (id, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use warden_console::LobbyMemberKind;

    fn member(id: u32, team: Team, index: u32) -> LobbyMember {
        LobbyMember {
            kind: LobbyMemberKind::Member,
            index,
            player: PlayerId::from_account_id(id),
            team,
            member_type: "MATCH_PLAYER".into(),
        }
    }

    fn status(id: u32, name: &str, user_id: u16) -> StatusSnapshot {
        StatusSnapshot {
            user_id,
            name: name.into(),
            player: PlayerId::from_account_id(id),
            connected: Duration::from_secs(60),
            ping_ms: 40,
            loss: 0,
            state: PlayerState::Active,
        }
    }

    #[test]
    fn lobby_team_survives_score_delta() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();
        let id = PlayerId::from_account_id(1);

        tracker.upsert_from_lobby(&member(1, Team::Blue, 3), now);
        tracker.apply_score_delta(id, 1, 0);

        assert_eq!(tracker.team_of(id), Some(Team::Blue));
        assert_eq!(tracker.scores_of(id).unwrap().kills, 1);
    }

    #[test]
    fn status_update_does_not_clear_lobby_fields() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();
        let id = PlayerId::from_account_id(1);

        tracker.upsert_from_lobby(&member(1, Team::Red, 5), now);
        tracker.upsert_from_status(&status(1, "Foo", 68), now);

        let record = tracker.record(id).unwrap();
        assert_eq!(record.team, Some(Team::Red));
        assert_eq!(record.client_index, Some(5));
        assert_eq!(record.name.as_deref(), Some("Foo"));
        assert_eq!(record.user_id, Some(68));
    }

    #[test]
    fn later_lobby_update_wins_on_team() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();
        let id = PlayerId::from_account_id(1);

        tracker.upsert_from_lobby(&member(1, Team::Red, 0), now);
        tracker.upsert_from_lobby(&member(1, Team::Blue, 0), now);

        assert_eq!(tracker.team_of(id), Some(Team::Blue));
    }

    #[test]
    fn name_lookup_none_one_ambiguous() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();

        assert_eq!(tracker.identity_for_name("Foo"), NameLookup::None);

        tracker.upsert_from_status(&status(1, "Foo", 10), now);
        assert_eq!(
            tracker.identity_for_name("Foo"),
            NameLookup::One(PlayerId::from_account_id(1))
        );

        tracker.upsert_from_status(&status(2, "Foo", 11), now);
        match tracker.identity_for_name("Foo") {
            NameLookup::Ambiguous(ids) => assert_eq!(ids.len(), 2),
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn new_lobby_id_resets_match_state() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();
        let id = PlayerId::from_account_id(1);

        assert!(tracker.begin_lobby(0xAAAA));
        tracker.upsert_from_status(&status(1, "Foo", 1), now);
        tracker.apply_score_delta(id, 3, 1);

        // Same lobby re-dumped: nothing resets.
        assert!(!tracker.begin_lobby(0xAAAA));
        assert_eq!(tracker.scores_of(id).unwrap().kills, 3);

        assert!(tracker.begin_lobby(0xBBBB));
        assert_eq!(tracker.player_count(), 0);
        assert_eq!(tracker.scores_of(id), None);
    }

    #[test]
    fn score_delta_for_unknown_identity_is_ignored() {
        let mut tracker = PlayerTracker::new();
        tracker.apply_score_delta(PlayerId::from_account_id(9), 1, 1);
        assert_eq!(tracker.player_count(), 0);
    }

    #[test]
    fn net_fields_refresh_independently() {
        let mut tracker = PlayerTracker::new();
        tracker.apply_net(&ConsoleLine::NetLatencyLoss {
            latency: 0.045,
            loss: 0.02,
        });
        tracker.apply_net(&ConsoleLine::NetPacketRate {
            inbound: 30.1,
            outbound: 29.9,
        });

        let net = tracker.network_health();
        assert_eq!(net.latency, Some(0.045));
        assert_eq!(net.packets_in_per_sec, Some(30.1));
        // Never touched, still unset.
        assert_eq!(net.choke_in, None);

        // A later latency line refreshes latency but leaves packet rate alone.
        tracker.apply_net(&ConsoleLine::NetLatencyLoss {
            latency: 0.050,
            loss: 0.02,
        });
        assert_eq!(tracker.network_health().latency, Some(0.050));
        assert_eq!(tracker.network_health().packets_in_per_sec, Some(30.1));
    }

    #[test]
    fn remove_drops_the_record() {
        let mut tracker = PlayerTracker::new();
        let now = Utc::now();
        let id = PlayerId::from_account_id(1);
        tracker.upsert_from_status(&status(1, "Foo", 1), now);
        assert!(tracker.remove(id).is_some());
        assert!(tracker.record(id).is_none());
    }
}
