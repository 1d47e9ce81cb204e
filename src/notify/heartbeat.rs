//! Heartbeat timestamp persistence
//!
//! The quiet-period clock survives across runs as a single Unix
//! timestamp in a small file. A missing or unreadable file reads as
//! "never notified", which makes the very first clean run send a
//! heartbeat and recreate the file.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HeartbeatFile {
    path: PathBuf,
}

impl HeartbeatFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the last-notified timestamp. Any failure degrades to `None`
    /// rather than aborting the run.
    pub fn load(&self) -> Option<DateTime<Utc>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no heartbeat file at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("could not read {}: {}", self.path.display(), e);
                return None;
            }
        };

        let secs = match raw.trim().parse::<i64>() {
            Ok(secs) => secs,
            Err(_) => {
                warn!("{} does not hold a Unix timestamp", self.path.display());
                return None;
            }
        };

        DateTime::from_timestamp(secs, 0)
    }

    /// Persist a new last-notified timestamp, truncating any previous one.
    pub fn record(&self, at: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        fs::write(&self.path, at.timestamp().to_string())
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
