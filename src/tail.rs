//! Console log tailing.
//!
//! The engine consumes lines; this collaborator sources them. It follows an
//! append-only log by polling for new bytes, hands back only complete lines,
//! and copes with the file being rotated or truncated under it by seeking
//! back to the start.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::debug;

/// Incremental reader over an append-only log file.
pub struct LogTailer {
    path: PathBuf,
    offset: u64,
    /// Trailing partial line carried across polls.
    partial: String,
}

impl LogTailer {
    /// Tail `path`, starting from its current end so only fresh output is
    /// processed.
    pub async fn from_end<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let offset = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            // File may not exist yet; the first poll will pick it up.
            Err(_) => 0,
        };
        Ok(Self {
            path,
            offset,
            partial: String::new(),
        })
    }

    /// Tail `path` from the beginning, replaying existing content.
    pub fn from_start<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: 0,
            partial: String::new(),
        }
    }

    /// Read any newly appended complete lines. Returns an empty vec when
    /// nothing (or only a partial line) has been written since the last poll.
    pub async fn poll(&mut self) -> std::io::Result<Vec<String>> {
        let mut file = match File::open(&self.path).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let len = file.metadata().await?.len();
        if len < self.offset {
            debug!(path = %self.path.display(), "log truncated, restarting from start");
            self.offset = 0;
            self.partial.clear();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset)).await?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.read_to_end(&mut buf).await?;
        self.offset = len;

        // The game writes UTF-8 with the occasional invalid byte; replace
        // rather than fail.
        self.partial.push_str(&String::from_utf8_lossy(&buf));

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.find('\n') {
            let mut line: String = self.partial.drain(..=pos).collect();
            line.truncate(line.trim_end_matches(['\r', '\n']).len());
            lines.push(line);
        }
        Ok(lines)
    }
}
