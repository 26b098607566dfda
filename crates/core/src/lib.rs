pub mod combat;
pub mod content;
pub mod encounter;
pub mod entity;
pub mod game;
pub mod journal;
pub mod map;
pub mod progression;
pub mod replay;
pub mod rng;
pub mod score;
#[cfg(test)]
mod test_support;
pub mod types;

pub use content::{ContentError, ContentPack, RunRules};
pub use encounter::EncounterPolicy;
pub use game::{Session, SessionError, SessionSnapshot};
pub use journal::{CommandJournal, JournalEntry, JournalError};
pub use replay::*;
pub use rng::{RandomSource, SeededRng};
pub use score::{RunRecord, ScoreBoard, ScoreError, ScoreFile, ScoreSink};
pub use types::*;
