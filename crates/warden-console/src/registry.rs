//! The parse registry: an ordered collection of matchers with
//! first-match-wins semantics.

use chrono::{DateTime, Utc};

use crate::error::ParseError;
use crate::event::{ConsoleEvent, ConsoleLine};
use crate::grammar::game::{ChatMatcher, KillMatcher};
use crate::grammar::lobby::{LobbyHeaderMatcher, LobbyMemberMatcher};
use crate::grammar::net::{FloatPairMatcher, SplitPacketMatcher};
use crate::grammar::status::StatusMatcher;
use crate::grammar::LineMatcher;

/// Ordered matcher registry.
///
/// Matchers are tried in priority order; the first hit wins. A fall-through
/// across every matcher yields [`ConsoleLine::Unrecognized`] - most console
/// output is not meaningful to the engine and that is not an error. A decode
/// failure, by contrast, is exclusive: the grammar that matched owns the
/// line, so no lower-priority matcher is consulted and the failure is
/// surfaced to the caller.
pub struct LineParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl LineParser {
    /// Registry with the default grammar set in priority order.
    ///
    /// Two orderings are load-bearing: chat before kill (a chat message can
    /// embed kill-feed text after its `" :  "` separator), and per-client
    /// data before per-client packets (shared textual prefix, see the net
    /// grammar module).
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(LobbyHeaderMatcher),
            Box::new(LobbyMemberMatcher),
            Box::new(StatusMatcher),
            Box::new(SplitPacketMatcher),
            Box::new(FloatPairMatcher::latency_loss()),
            Box::new(FloatPairMatcher::packet_rate()),
            Box::new(FloatPairMatcher::choke()),
            Box::new(FloatPairMatcher::flow()),
            Box::new(FloatPairMatcher::channel_total()),
            Box::new(FloatPairMatcher::total_packets()),
            Box::new(FloatPairMatcher::total_data()),
            Box::new(FloatPairMatcher::per_client_data()),
            Box::new(FloatPairMatcher::per_client_packets()),
            Box::new(ChatMatcher),
            Box::new(KillMatcher),
        ])
    }

    /// Registry with a caller-supplied matcher sequence.
    pub fn with_matchers(matchers: Vec<Box<dyn LineMatcher>>) -> Self {
        Self { matchers }
    }

    /// Number of registered matchers.
    pub fn matcher_count(&self) -> usize {
        self.matchers.len()
    }

    /// Classify and decode one raw line.
    pub fn parse(&self, text: &str, timestamp: DateTime<Utc>) -> Result<ConsoleEvent, ParseError> {
        for matcher in &self.matchers {
            if let Some(line) = matcher.try_parse(text)? {
                return Ok(ConsoleEvent { timestamp, line });
            }
        }
        Ok(ConsoleEvent {
            timestamp,
            line: ConsoleLine::Unrecognized,
        })
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}
