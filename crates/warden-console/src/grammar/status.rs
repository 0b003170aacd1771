//! `status` dump grammar.
//!
//! The status row is the identity-bearing line of the engine: it is the only
//! grammar that ties a display name to a stable identity, which is what
//! resolves name-keyed delayed bans.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use super::{decode_field, LineMatcher};
use crate::error::ParseError;
use crate::event::{ConsoleLine, PlayerId, PlayerState, StatusSnapshot};

static STATUS_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^#\s+(\d+)\s+"(.+)"\s+\[U:(\d+):(\d+)\]\s+(?:(\d+):)?(\d{1,2}):(\d{2})\s+(\d+)\s+(\d+)\s+(\w+)$"#,
    )
    .expect("static pattern")
});

/// `#    68 "Foo"   [U:1:12345678]   12:34    48    0 active`
pub struct StatusMatcher;

impl LineMatcher for StatusMatcher {
    fn name(&self) -> &'static str {
        "status"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = STATUS_ROW.captures(text) else {
            return Ok(None);
        };

        let hours: u64 = match caps.get(5) {
            Some(h) => decode_field(self.name(), "hours", h.as_str())?,
            None => 0,
        };
        let minutes: u64 = decode_field(self.name(), "minutes", &caps[6])?;
        let seconds: u64 = decode_field(self.name(), "seconds", &caps[7])?;
        let account_id: u32 = decode_field(self.name(), "account_id", &caps[4])?;
        let state = PlayerState::from_token(&caps[10])?;

        Ok(Some(ConsoleLine::Status(StatusSnapshot {
            user_id: decode_field(self.name(), "userid", &caps[1])?,
            name: caps[2].to_string(),
            player: PlayerId::from_account_id(account_id),
            connected: Duration::from_secs(hours * 3600 + minutes * 60 + seconds),
            ping_ms: decode_field(self.name(), "ping", &caps[8])?,
            loss: decode_field(self.name(), "loss", &caps[9])?,
            state,
        })))
    }
}
