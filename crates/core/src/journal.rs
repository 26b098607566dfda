//! Ordered record of everything fed into a session: commands and clock advances.
//! Together with the seed it is enough to rebuild the session exactly.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Command;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("journal is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported journal version {0}")]
    UnsupportedVersion(u16),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    Command { command: Command },
    Clock { millis: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandJournal {
    pub format_version: u16,
    pub seed: u64,
    pub entries: Vec<JournalEntry>,
}

impl CommandJournal {
    pub fn new(seed: u64) -> Self {
        Self { format_version: JOURNAL_FORMAT_VERSION, seed, entries: Vec::new() }
    }

    pub fn append_command(&mut self, command: Command) {
        self.entries.push(JournalEntry::Command { command });
    }

    /// Consecutive clock advances are merged into one entry.
    pub fn append_clock(&mut self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        if let Some(JournalEntry::Clock { millis: last }) = self.entries.last_mut() {
            *last = last.saturating_add(millis);
            return;
        }
        self.entries.push(JournalEntry::Clock { millis });
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().filter_map(|entry| match entry {
            JournalEntry::Command { command } => Some(command),
            JournalEntry::Clock { .. } => None,
        })
    }

    pub fn load(path: &Path) -> Result<Self, JournalError> {
        let content = fs::read_to_string(path)?;
        let journal: Self = serde_json::from_str(&content)?;
        if journal.format_version != JOURNAL_FORMAT_VERSION {
            return Err(JournalError::UnsupportedVersion(journal.format_version));
        }
        Ok(journal)
    }

    pub fn write_atomic(&self, path: &Path) -> Result<(), JournalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
