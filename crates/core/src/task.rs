//! Task model - ad-hoc work items on the team board.
//!
//! Tasks are independent of content projects: a flat entity moving freely
//! between five fixed board columns.

use serde::{Deserialize, Serialize};

use crate::id::{MemberId, TaskId};
use crate::project::Priority;
use crate::Time;

/// An ad-hoc work item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Board column
    pub status: TaskStatus,

    /// Priority
    pub priority: Priority,

    /// Member responsible
    pub assignee: MemberId,

    /// Optional reviewer
    pub reviewer: Option<MemberId>,

    /// Optional percentage complete (0-100)
    pub progress: Option<u8>,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Due date
    pub due_date: Option<Time>,

    /// Set exactly when the task enters `done`, cleared when it leaves
    pub completed_date: Option<Time>,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,

    /// Monotonic counter for optimistic concurrency
    pub version: u64,
}

impl Task {
    /// Create a task in the backlog at version 1.
    pub fn new(title: String, description: String, priority: Priority, assignee: MemberId, now: Time) -> Self {
        Self {
            id: TaskId::new(),
            title,
            description,
            status: TaskStatus::Backlog,
            priority,
            assignee,
            reviewer: None,
            progress: None,
            tags: Vec::new(),
            due_date: None,
            completed_date: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

/// Board column. The column order is fixed; moves between any two columns
/// are permitted (tasks have no workflow ordering, unlike stages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Backlog
    Backlog,
    /// To do
    Todo,
    /// In progress
    InProgress,
    /// Review
    Review,
    /// Done
    Done,
}

impl TaskStatus {
    /// Board columns in display order.
    pub const COLUMNS: [TaskStatus; 5] = [
        TaskStatus::Backlog,
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Wire name (snake_case, matching the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a column name outside the fixed board set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown board column: {0}")]
pub struct UnknownColumn(pub String);

impl std::str::FromStr for TaskStatus {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::COLUMNS
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_parse_round_trips() {
        for column in TaskStatus::COLUMNS {
            assert_eq!(column.as_str().parse::<TaskStatus>(), Ok(column));
        }
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = "archived".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, UnknownColumn("archived".to_string()));
    }
}
