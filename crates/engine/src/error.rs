//! Engine error taxonomy.

use prodflow_core::ProjectStatus;
use prodflow_storage::StorageError;

/// Error type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by workflow mutations and queries.
///
/// A failed mutation never writes; the stored entity is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Progress value outside [0, 100]
    #[error("progress out of range: {value} (expected 0-100)")]
    InvalidRange {
        /// The rejected value
        value: i64,
    },

    /// Stage name outside the canonical set
    #[error("unknown stage: {0}")]
    UnknownStage(String),

    /// Unknown project/task/milestone id
    #[error("not found: {0}")]
    NotFound(String),

    /// Status or column rule violation
    #[error("illegal transition: {from} -> {to}")]
    IllegalTransition {
        /// Current state
        from: String,
        /// Rejected target state
        to: String,
    },

    /// Stage mutation attempted on a published/cancelled project
    #[error("project is {0}, no further stage mutation accepted")]
    TerminalProject(ProjectStatus),

    /// Stale `expected_version`; caller should re-read and retry
    #[error("concurrent modification: expected version {expected}, stored {actual}")]
    Conflict {
        /// Version the caller last read
        expected: u64,
        /// Version actually stored
        actual: u64,
    },

    /// Backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<prodflow_core::UnknownStage> for EngineError {
    fn from(err: prodflow_core::UnknownStage) -> Self {
        EngineError::UnknownStage(err.0)
    }
}
