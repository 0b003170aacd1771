//! Behavioral mark lists.
//!
//! Three independent identity sets: cheater, suspicious, exploiter. The sets
//! are not mutually exclusive; an identity may carry any combination of
//! marks. Mutation is idempotent, and the whole structure serializes as one
//! JSON document for the persistence layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_console::PlayerId;

/// Behavioral classification a player can be marked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Cheater,
    Suspicious,
    Exploiter,
}

impl MarkType {
    /// All mark kinds, for iteration.
    pub const ALL: [MarkType; 3] = [Self::Cheater, Self::Suspicious, Self::Exploiter];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cheater => "cheater",
            Self::Suspicious => "suspicious",
            Self::Exploiter => "exploiter",
        }
    }
}

/// The three mark sets, keyed by stable identity only. Display names are
/// never a substitute key here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkLists {
    #[serde(default)]
    cheaters: BTreeSet<PlayerId>,
    #[serde(default)]
    suspicious: BTreeSet<PlayerId>,
    #[serde(default)]
    exploiters: BTreeSet<PlayerId>,
}

impl MarkLists {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, mark: MarkType) -> &BTreeSet<PlayerId> {
        match mark {
            MarkType::Cheater => &self.cheaters,
            MarkType::Suspicious => &self.suspicious,
            MarkType::Exploiter => &self.exploiters,
        }
    }

    fn set_mut(&mut self, mark: MarkType) -> &mut BTreeSet<PlayerId> {
        match mark {
            MarkType::Cheater => &mut self.cheaters,
            MarkType::Suspicious => &mut self.suspicious,
            MarkType::Exploiter => &mut self.exploiters,
        }
    }

    /// Add an identity to a list. Returns `false` when it was already there;
    /// either way the identity is marked afterwards.
    pub fn mark(&mut self, player: PlayerId, mark: MarkType) -> bool {
        self.set_mut(mark).insert(player)
    }

    /// Remove an identity from a list. Returns `false` when it was absent.
    pub fn unmark(&mut self, player: PlayerId, mark: MarkType) -> bool {
        self.set_mut(mark).remove(&player)
    }

    pub fn is_marked(&self, player: PlayerId, mark: MarkType) -> bool {
        self.set(mark).contains(&player)
    }

    /// Whether the identity appears on any of the three lists.
    pub fn is_marked_any(&self, player: PlayerId) -> bool {
        MarkType::ALL.iter().any(|&m| self.is_marked(player, m))
    }

    pub fn all_marked(&self, mark: MarkType) -> &BTreeSet<PlayerId> {
        self.set(mark)
    }

    pub fn total(&self) -> usize {
        self.cheaters.len() + self.suspicious.len() + self.exploiters.len()
    }
}
