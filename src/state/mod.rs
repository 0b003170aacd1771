//! Engine state: player tracking, mark lists, delayed bans, and the façade.

pub mod delayed;
pub mod engine;
pub mod marks;
pub mod persistence;
pub mod tracker;

pub use delayed::{BanResolution, DelayedBan, DelayedBanQueue};
pub use engine::{ConsoleLineListener, Engine, ListenerToken};
pub use marks::{MarkLists, MarkType};
pub use persistence::{MarkStore, PersistError};
pub use tracker::{NameLookup, NetworkHealth, PlayerRecord, PlayerScores, PlayerTracker};
