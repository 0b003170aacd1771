//! Error types for console-line parsing.
//!
//! A matcher distinguishes two outcomes that are easy to conflate: a line its
//! grammar does not recognize at all (`Ok(None)`, not an error), and a line
//! its grammar *does* recognize whose fields fail to decode (`Err`). The
//! second case is surfaced here so grammar gaps are diagnosable instead of
//! silently dropped.

use thiserror::Error;

/// Convenience type alias for Results using [`ParseError`].
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// A grammar matched the line but one of its fields failed to decode.
///
/// These are never fatal: the offending line is skipped, engine state is
/// untouched, and parsing continues with the next input line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A numeric field matched the grammar but did not fit its target type.
    #[error("{grammar}: invalid {field} field {value:?}")]
    InvalidNumber {
        /// Name of the grammar that matched.
        grammar: &'static str,
        /// Field within that grammar.
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// A socket-type token outside the known enumeration.
    #[error("split-packet: unknown socket type {token:?}")]
    UnknownSocketType {
        /// The unrecognized three-character token.
        token: String,
    },

    /// A lobby team token outside the known enumeration.
    #[error("lobby-member: unknown team {token:?}")]
    UnknownTeam {
        /// The unrecognized team token.
        token: String,
    },

    /// A status-line state token outside the known enumeration.
    #[error("status: unknown player state {token:?}")]
    UnknownPlayerState {
        /// The unrecognized state token.
        token: String,
    },
}

impl ParseError {
    /// Static code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } => "invalid_number",
            Self::UnknownSocketType { .. } => "unknown_socket_type",
            Self::UnknownTeam { .. } => "unknown_team",
            Self::UnknownPlayerState { .. } => "unknown_player_state",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::InvalidNumber {
            grammar: "split-packet",
            field: "mtu",
            value: "99999999999".into(),
        };
        assert_eq!(
            format!("{}", err),
            "split-packet: invalid mtu field \"99999999999\""
        );

        let err = ParseError::UnknownSocketType {
            token: "xyz".into(),
        };
        assert_eq!(format!("{}", err), "split-packet: unknown socket type \"xyz\"");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ParseError::UnknownTeam { token: "T".into() }.error_code(),
            "unknown_team"
        );
        assert_eq!(
            ParseError::UnknownPlayerState { token: "s".into() }.error_code(),
            "unknown_player_state"
        );
    }
}
