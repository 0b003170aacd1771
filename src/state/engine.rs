//! The engine façade.
//!
//! Owns the parse registry, player tracker, delayed-ban queue, and mark
//! lists. `feed_line` is the single entry point: parse, apply, fan out.
//! It is a pure synchronous in-memory transformation; output ordering
//! exactly mirrors input line ordering, and the engine never reorders or
//! batches across calls.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use warden_console::{
    ConsoleEvent, ConsoleLine, KillNotification, LineParser, ParseError, PlayerId,
};

use super::delayed::{BanResolution, DelayedBan, DelayedBanQueue};
use super::marks::{MarkLists, MarkType};
use super::tracker::{NameLookup, PlayerTracker};

/// Receiver for engine output.
///
/// Callbacks run synchronously inside `feed_line`, in listener-registration
/// order, before `feed_line` returns. The default impls let a listener
/// subscribe to only what it cares about.
pub trait ConsoleLineListener {
    /// Every parsed line, including `Unrecognized`.
    fn on_console_line(&mut self, event: &ConsoleEvent);

    /// A delayed ban resolved to a stable identity.
    fn on_ban_confirmed(&mut self, identity: PlayerId, ban: &DelayedBan) {
        let _ = (identity, ban);
    }

    /// A delayed ban aged out unresolved. The action is dropped for good.
    fn on_ban_expired(&mut self, ban: &DelayedBan) {
        let _ = ban;
    }
}

/// Stable handle for listener removal.
///
/// Tokens are never reused within an engine's lifetime, so a stale token
/// simply fails to remove rather than removing somebody else's listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

/// Single-threaded console intelligence engine.
///
/// All mutation happens through `feed_line`, `tick`, and the explicit
/// mark/ban operations; a multi-threaded host must wrap the engine in one
/// coarse lock.
pub struct Engine {
    parser: LineParser,
    tracker: PlayerTracker,
    marks: MarkLists,
    delayed: DelayedBanQueue,
    listeners: Vec<(ListenerToken, Box<dyn ConsoleLineListener>)>,
    next_token: u64,
    parsed_line_count: u64,
}

impl Engine {
    /// `ban_expiry` is the delayed-ban window (policy, typically from config).
    pub fn new(ban_expiry: Duration, marks: MarkLists) -> Self {
        Self {
            parser: LineParser::new(),
            tracker: PlayerTracker::new(),
            marks,
            delayed: DelayedBanQueue::new(ban_expiry),
            listeners: Vec::new(),
            next_token: 0,
            parsed_line_count: 0,
        }
    }

    /// Register a listener; fan-out order is registration order.
    pub fn add_listener(&mut self, listener: Box<dyn ConsoleLineListener>) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, listener));
        token
    }

    /// Remove a listener by token. Returns `false` for unknown tokens.
    pub fn remove_listener(&mut self, token: ListenerToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(t, _)| *t != token);
        self.listeners.len() != before
    }

    /// Ingest one raw console line.
    ///
    /// On a decode failure the error is returned, engine state is unchanged,
    /// and the engine remains usable for the next line.
    pub fn feed_line(&mut self, text: &str, timestamp: DateTime<Utc>) -> Result<(), ParseError> {
        let event = self.parser.parse(text, timestamp)?;
        self.parsed_line_count += 1;

        let resolutions = self.apply(&event);

        for (_, listener) in &mut self.listeners {
            listener.on_console_line(&event);
        }
        self.notify_resolutions(resolutions);

        // Pending bans age against line timestamps as well as host ticks.
        let expired = self.delayed.expire(timestamp);
        self.notify_resolutions(expired);

        Ok(())
    }

    /// Advance time-based state without an input line. Hosts call this
    /// periodically so pending bans expire even when the log goes quiet.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let expired = self.delayed.expire(now);
        self.notify_resolutions(expired);
    }

    /// Queue a mark for the player currently named `name`, to be committed
    /// once an identity-bearing update confirms who that is.
    pub fn submit_delayed_ban(&mut self, name: impl Into<String>, mark: MarkType, now: DateTime<Utc>) {
        let name = name.into();
        debug!(name = %name, mark = mark.label(), "queued delayed ban");
        self.delayed.submit(name, mark, now);
    }

    /// Mark an identity directly. Idempotent.
    pub fn mark(&mut self, player: PlayerId, mark: MarkType) -> bool {
        let newly = self.marks.mark(player, mark);
        if newly {
            info!(player = %player, mark = mark.label(), "player marked");
        }
        newly
    }

    /// Remove a mark from an identity.
    pub fn unmark(&mut self, player: PlayerId, mark: MarkType) -> bool {
        self.marks.unmark(player, mark)
    }

    pub fn is_marked(&self, player: PlayerId, mark: MarkType) -> bool {
        self.marks.is_marked(player, mark)
    }

    pub fn tracker(&self) -> &PlayerTracker {
        &self.tracker
    }

    pub fn marks(&self) -> &MarkLists {
        &self.marks
    }

    pub fn pending_ban_count(&self) -> usize {
        self.delayed.pending_count()
    }

    pub fn parsed_line_count(&self) -> u64 {
        self.parsed_line_count
    }

    /// Route a parsed event to the components that care about its kind.
    /// Returns ban resolutions to deliver after the line fan-out.
    fn apply(&mut self, event: &ConsoleEvent) -> Vec<BanResolution> {
        match &event.line {
            ConsoleLine::LobbyHeader { lobby_id, .. } => {
                if self.tracker.begin_lobby(*lobby_id) {
                    info!(lobby_id = *lobby_id, "new lobby");
                }
                Vec::new()
            }
            ConsoleLine::LobbyMember(member) => {
                self.tracker.upsert_from_lobby(member, event.timestamp);
                Vec::new()
            }
            ConsoleLine::Status(snap) => {
                self.tracker.upsert_from_status(snap, event.timestamp);
                // The status row is the identity-bearing update that settles
                // name-keyed pending bans.
                self.delayed.resolve(&snap.name, snap.player)
            }
            ConsoleLine::Kill(kill) => {
                self.apply_kill(kill);
                Vec::new()
            }
            line @ (ConsoleLine::NetLatencyLoss { .. }
            | ConsoleLine::NetPacketRate { .. }
            | ConsoleLine::NetChoke { .. }
            | ConsoleLine::NetFlow { .. }
            | ConsoleLine::NetTotalPackets { .. }
            | ConsoleLine::NetTotalData { .. }) => {
                self.tracker.apply_net(line);
                Vec::new()
            }
            // Lifetime totals and per-client figures stay out of the
            // match-wide health; chat and unrecognized lines are fan-out only.
            ConsoleLine::NetChannelTotal { .. }
            | ConsoleLine::NetPerClientPackets { .. }
            | ConsoleLine::NetPerClientData { .. }
            | ConsoleLine::SplitPacket(_)
            | ConsoleLine::Chat(_)
            | ConsoleLine::Unrecognized => Vec::new(),
        }
    }

    /// Kill-feed lines are name-keyed; an ambiguous or unknown name drops
    /// that half of the delta rather than guessing.
    fn apply_kill(&mut self, kill: &KillNotification) {
        match self.tracker.identity_for_name(&kill.killer) {
            NameLookup::One(id) => self.tracker.apply_score_delta(id, 1, 0),
            lookup => debug!(name = %kill.killer, ?lookup, "kill credit dropped"),
        }
        match self.tracker.identity_for_name(&kill.victim) {
            NameLookup::One(id) => self.tracker.apply_score_delta(id, 0, 1),
            lookup => debug!(name = %kill.victim, ?lookup, "death credit dropped"),
        }
    }

    fn notify_resolutions(&mut self, resolutions: Vec<BanResolution>) {
        for resolution in resolutions {
            match resolution {
                BanResolution::Confirmed { ban, identity } => {
                    self.marks.mark(identity, ban.mark);
                    info!(player = %identity, name = %ban.name, mark = ban.mark.label(), "delayed ban confirmed");
                    for (_, listener) in &mut self.listeners {
                        listener.on_ban_confirmed(identity, &ban);
                    }
                }
                BanResolution::Expired(ban) => {
                    warn!(name = %ban.name, submitted_at = %ban.submitted_at, "delayed ban expired unresolved");
                    for (_, listener) in &mut self.listeners {
                        listener.on_ban_expired(&ban);
                    }
                }
            }
        }
    }
}
