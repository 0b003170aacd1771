//! # warden-console
//!
//! Typed parsing of game-client console output.
//!
//! The console log is an append-only stream of free-form text in which a
//! handful of line formats carry match intelligence: lobby-debug dumps,
//! `status` rows, kill feed, chat, and network diagnostics. This crate turns
//! each raw line into a [`ConsoleLine`] via a priority-ordered registry of
//! independent grammar matchers.
//!
//! ## Contract
//!
//! - A matcher returning `Ok(None)` simply does not recognize the line;
//!   the registry falls through to the next matcher.
//! - A matcher returning `Err` recognized the line but could not decode a
//!   field; the registry stops there and surfaces the failure (a grammar
//!   match is exclusive by construction).
//! - A full fall-through is [`ConsoleLine::Unrecognized`], never an error.
//!
//! ```rust
//! use chrono::Utc;
//! use warden_console::{ConsoleLine, LineParser};
//!
//! let parser = LineParser::new();
//! let event = parser.parse("- latency: 0.045, loss 0.02", Utc::now()).unwrap();
//! assert!(matches!(event.line, ConsoleLine::NetLatencyLoss { .. }));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod grammar;
pub mod registry;

pub use self::error::{ParseError, Result};
pub use self::event::{
    ChatMessage, ConsoleEvent, ConsoleLine, KillNotification, LobbyMember, LobbyMemberKind,
    PlayerId, PlayerState, SocketType, SplitPacket, StatusSnapshot, Team,
};
pub use self::grammar::LineMatcher;
pub use self::registry::LineParser;
