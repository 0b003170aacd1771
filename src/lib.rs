//! matchwarden - console-log intelligence for multiplayer matches.
//!
//! Feeds a game client's append-only console log through the
//! [`warden_console`] line parser and aggregates the resulting events into
//! per-player state: team, scores, network quality, and behavioral marks
//! (cheater / suspicious / exploiter), including delayed name-keyed ban
//! confirmation.
//!
//! The core lives in [`state::Engine`]; everything around it (config, log
//! tailing, mark persistence) is host plumbing.

pub mod config;
pub mod state;
pub mod tail;

pub use config::Config;
pub use state::{
    ConsoleLineListener, DelayedBan, Engine, ListenerToken, MarkLists, MarkStore, MarkType,
    NameLookup, PlayerTracker,
};
pub use warden_console::{ConsoleEvent, ConsoleLine, LineParser, ParseError, PlayerId, Team};
