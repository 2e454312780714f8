//! Optional append-only log of the session.

use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::warn;

use crate::message::LINE_ENDINGS;

/// Appends one entry per call to a file, reopening it every time so the log
/// can be rotated or removed while the client runs.
#[derive(Debug, Clone)]
pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `line` without its line ending. Failures are reported as
    /// warnings and otherwise ignored.
    pub async fn append(&self, line: &str) {
        if let Err(error) = self.try_append(line).await {
            warn!(?error, path = %self.path.display(), "failed to append to transcript");
        }
    }

    async fn try_append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut entry = String::with_capacity(line.len() + 1);
        entry.push_str(line.trim_end_matches(LINE_ENDINGS));
        entry.push('\n');
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}
