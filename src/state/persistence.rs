//! Mark-list persistence.
//!
//! The engine only ever operates on in-memory sets; this store is the
//! external collaborator that serializes them. One JSON document holds all
//! three lists. Saves go through a temp file plus rename so a crash mid-write
//! cannot truncate the existing list.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::marks::MarkLists;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access mark list file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode/decode mark lists: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed store for the mark lists.
#[derive(Debug, Clone)]
pub struct MarkStore {
    path: PathBuf,
}

impl MarkStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the lists. A missing file is a fresh install, not an error.
    pub fn load(&self) -> Result<MarkLists, PersistError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no mark list file, starting empty");
            return Ok(MarkLists::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let lists: MarkLists = serde_json::from_str(&content)?;
        info!(path = %self.path.display(), count = lists.total(), "loaded mark lists");
        Ok(lists)
    }

    /// Save the lists atomically.
    pub fn save(&self, lists: &MarkLists) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(lists)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
