//! Scoreboard-relevant gameplay grammars: kill feed and chat.
//!
//! Both are name-keyed; neither carries an identity. Chat must be tried
//! before the kill grammar in the registry: a chat message whose text happens
//! to read "... killed ... with ..." would otherwise decode as a kill.

use std::sync::LazyLock;

use regex::Regex;

use super::LineMatcher;
use crate::error::ParseError;
use crate::event::{ChatMessage, ConsoleLine, KillNotification};

static KILL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) killed (.+) with (.+)\.( \(crit\))?$").expect("static pattern")
});

/// `Foo killed Bar with scattergun. (crit)`
pub struct KillMatcher;

impl LineMatcher for KillMatcher {
    fn name(&self) -> &'static str {
        "kill-feed"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = KILL.captures(text) else {
            return Ok(None);
        };
        Ok(Some(ConsoleLine::Kill(KillNotification {
            killer: caps[1].to_string(),
            victim: caps[2].to_string(),
            weapon: caps[3].to_string(),
            crit: caps.get(4).is_some(),
        })))
    }
}

static CHAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*DEAD\* )?(\(TEAM\) )?(.+?) :  (.*)$").expect("static pattern")
});

/// `*DEAD* (TEAM) Foo :  message text`
pub struct ChatMatcher;

impl LineMatcher for ChatMatcher {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError> {
        let Some(caps) = CHAT.captures(text) else {
            return Ok(None);
        };
        Ok(Some(ConsoleLine::Chat(ChatMessage {
            speaker: caps[3].to_string(),
            text: caps[4].to_string(),
            dead: caps.get(1).is_some(),
            team_chat: caps.get(2).is_some(),
        })))
    }
}
