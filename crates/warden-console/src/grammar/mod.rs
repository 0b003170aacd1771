//! Line grammars.
//!
//! Each matcher owns exactly one compiled pattern and its decoder. Matchers
//! are stateless and unaware of each other; priority between overlapping
//! grammars is the registry's concern (see [`crate::registry`]).

use std::str::FromStr;

use crate::error::ParseError;
use crate::event::ConsoleLine;

pub mod game;
pub mod lobby;
pub mod net;
pub mod status;

/// One recognized line format plus its decoding rule.
///
/// `Ok(None)` means the grammar does not apply to this line at all.
/// `Err` means the grammar matched but a field failed to decode; the two
/// cases are deliberately distinct (a silent drop would hide a grammar gap).
pub trait LineMatcher: Send + Sync {
    /// Short grammar name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Attempt to classify and decode `text`.
    fn try_parse(&self, text: &str) -> Result<Option<ConsoleLine>, ParseError>;
}

/// Decode a captured numeric field, mapping failure to a parse error that
/// names the grammar and field.
pub(crate) fn decode_field<T: FromStr>(
    grammar: &'static str,
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        grammar,
        field,
        value: value.to_string(),
    })
}
