use std::time::Duration;

use thiserror::Error;

use crate::content::ContentPack;
use crate::game::{Session, SessionError};
use crate::journal::{CommandJournal, JournalEntry};
use crate::score::ScoreBoard;
use crate::types::{CommandOutcome, RunState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("journal entry {index} was refused by the session: {source}")]
    InvalidCommand { index: usize, source: SessionError },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReplayResult {
    pub final_state: RunState,
    pub final_snapshot_hash: u64,
    pub commands_applied: u64,
    pub commands_rejected: u64,
    /// Runs that ended while replaying, in the order they were recorded.
    pub recorded_runs: ScoreBoard,
}

/// Rebuilds a session from its seed and journal. Replay stops early on `Quit`.
pub fn replay_journal(
    content: &ContentPack,
    journal: &CommandJournal,
) -> Result<ReplayResult, ReplayError> {
    let mut session = Session::new(content, journal.seed, ScoreBoard::new());
    let mut commands_rejected = 0;

    for (index, entry) in journal.entries.iter().enumerate() {
        match entry {
            JournalEntry::Clock { millis } => {
                session.advance_clock(Duration::from_millis(*millis));
            }
            JournalEntry::Command { command } => {
                let outcome = session
                    .handle(command.clone())
                    .map_err(|source| ReplayError::InvalidCommand { index, source })?;
                match outcome {
                    CommandOutcome::Applied => {}
                    CommandOutcome::Rejected(_) => commands_rejected += 1,
                    CommandOutcome::Quit => break,
                }
            }
        }
    }

    Ok(ReplayResult {
        final_state: session.state(),
        final_snapshot_hash: session.snapshot_hash(),
        commands_applied: session.commands_applied(),
        commands_rejected,
        recorded_runs: session.into_score_sink(),
    })
}
