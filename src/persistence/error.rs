//! Persistence errors.
//!
//! None of these are fatal to a session. Loading maps every variant to
//! "keep default positions"; saving logs and tries again on the next tick.

use std::path::PathBuf;

/// Failure reading or writing a save slot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("no save file at {0}")]
    Missing(PathBuf),

    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save encoding failed: {0}")]
    Encode(String),

    #[error("save file unreadable: {0}")]
    Decode(String),

    #[error("save block {block} has negative count {count}")]
    NegativeCount { block: String, count: i32 },

    #[error("save block {block} holds {count} entries, more than the format allows")]
    CountOverflow { block: String, count: usize },

    #[error("save file has {0} unread trailing bytes")]
    TrailingBytes(usize),

    #[error("autosave worker panicked")]
    WorkerPanicked,
}

impl PersistenceError {
    /// Whether this error means the file content could not be used
    /// (missing, truncated, corrupt or laid out for a different session).
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            PersistenceError::Missing(_)
                | PersistenceError::Decode(_)
                | PersistenceError::NegativeCount { .. }
                | PersistenceError::TrailingBytes(_)
        )
    }
}

impl From<bincode::Error> for PersistenceError {
    fn from(e: bincode::Error) -> Self {
        PersistenceError::Decode(e.to_string())
    }
}
