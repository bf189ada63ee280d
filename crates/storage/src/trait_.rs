//! Storage trait abstraction.

use async_trait::async_trait;
use prodflow_core::{ContentProject, ProjectId, Task, TaskId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Insert of an id that already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Compare-and-swap against a stale version
    #[error("version conflict: expected {expected}, stored {actual}")]
    VersionConflict {
        /// Version the writer last read
        expected: u64,
        /// Version actually stored
        actual: u64,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for prodflow entities.
///
/// Every write is a single atomic operation. `compare_and_swap_*`
/// replaces the stored document only if its version still equals
/// `expected_version`; a concurrent writer that advanced the version
/// first causes [`StorageError::VersionConflict`]. Reads hand out owned
/// copies, so readers never observe a torn write.
#[async_trait]
pub trait Store: Send + Sync {
    // === Project operations ===

    /// Insert a new project. Fails if the id already exists.
    async fn insert_project(&mut self, project: &ContentProject) -> Result<()>;

    /// Load a project by ID.
    async fn load_project(&self, id: ProjectId) -> Result<Option<ContentProject>>;

    /// Replace a project if the stored version equals `expected_version`.
    async fn compare_and_swap_project(
        &mut self,
        project: &ContentProject,
        expected_version: u64,
    ) -> Result<()>;

    /// List all projects.
    async fn list_projects(&self) -> Result<Vec<ContentProject>>;

    /// Delete a project.
    async fn delete_project(&mut self, id: ProjectId) -> Result<()>;

    // === Task operations ===

    /// Insert a new task. Fails if the id already exists.
    async fn insert_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// Replace a task if the stored version equals `expected_version`.
    async fn compare_and_swap_task(&mut self, task: &Task, expected_version: u64) -> Result<()>;

    /// List all tasks.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Delete a task.
    async fn delete_task(&mut self, id: TaskId) -> Result<()>;
}
