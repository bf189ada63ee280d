//! Task board model.
//!
//! Tasks move freely between the five fixed columns; unlike project
//! stages there is no workflow ordering. The one piece of derived state
//! is `completed_date`: entering `done` sets it, leaving `done` clears
//! it.

#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use prodflow_core::{MemberId, Priority, Task, TaskId, TaskStatus, Time, UnknownColumn};
use prodflow_engine::{EngineError, Result};
use prodflow_query::TaskFilter;
use prodflow_storage::{StorageError, Store};
use tokio::sync::Mutex;
use tracing::debug;

/// Board columns in display order. Alias for [`TaskStatus::COLUMNS`].
pub const COLUMN_ORDER: [TaskStatus; 5] = TaskStatus::COLUMNS;

/// Move a task to a column.
///
/// Any column-to-column move is permitted. Moving into `done` stamps
/// `completed_date = now`; moving out of `done` clears it. Re-asserting
/// the current column keeps an existing completion date. Bumps the
/// version.
pub fn move_task(task: &mut Task, new_status: TaskStatus, now: Time) {
    if new_status == TaskStatus::Done && task.status != TaskStatus::Done {
        task.completed_date = Some(now);
    } else if new_status != TaskStatus::Done {
        task.completed_date = None;
    }
    task.status = new_status;
    task.updated_at = now;
    task.version += 1;
}

/// Parse a target column name for a move.
///
/// The five fixed columns are the only legal targets; an unknown name is
/// a transition-rule violation, reported against the task's current
/// column.
pub fn parse_column(current: TaskStatus, name: &str) -> Result<TaskStatus> {
    name.parse()
        .map_err(|UnknownColumn(name)| EngineError::IllegalTransition {
            from: current.to_string(),
            to: name,
        })
}

/// Specification for creating a task.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Member responsible
    pub assignee: MemberId,
    /// Optional reviewer
    pub reviewer: Option<MemberId>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Due date
    pub due_date: Option<Time>,
}

/// Task board service over a task store.
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Create a task from a spec, starting in the backlog.
    async fn create_task(&self, spec: TaskSpec) -> Result<Task>;

    /// Load a task.
    async fn get_task(&self, id: TaskId) -> Result<Task>;

    /// Move a task to a column.
    async fn move_task(&self, id: TaskId, status: TaskStatus, expected_version: u64)
        -> Result<Task>;

    /// Set a task's optional progress (0-100).
    async fn update_progress(&self, id: TaskId, progress: i64, expected_version: u64)
        -> Result<Task>;

    /// List tasks matching the filter, as an owned snapshot.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Delete a task.
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}

/// Basic board service implementation.
pub struct BasicBoardService<S: Store> {
    storage: Arc<Mutex<S>>,
}

impl<S: Store> Clone for BasicBoardService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: Store> BasicBoardService<S> {
    /// Create a new board service.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    async fn mutate<F>(&self, id: TaskId, expected_version: u64, apply: F) -> Result<Task>
    where
        F: FnOnce(&mut Task, Time) -> Result<()> + Send,
    {
        let mut storage = self.storage.lock().await;
        let mut task = storage
            .load_task(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        if task.version != expected_version {
            return Err(EngineError::Conflict {
                expected: expected_version,
                actual: task.version,
            });
        }

        apply(&mut task, Utc::now())?;

        match storage.compare_and_swap_task(&task, expected_version).await {
            Ok(()) => {
                debug!(task = %id, version = task.version, "task mutated");
                Ok(task)
            }
            Err(StorageError::VersionConflict { expected, actual }) => {
                Err(EngineError::Conflict { expected, actual })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<S: Store + 'static> BoardService for BasicBoardService<S> {
    async fn create_task(&self, spec: TaskSpec) -> Result<Task> {
        let now = Utc::now();
        let mut task = Task::new(spec.title, spec.description, spec.priority, spec.assignee, now);
        task.reviewer = spec.reviewer;
        task.tags = spec.tags;
        task.due_date = spec.due_date;

        self.storage.lock().await.insert_task(&task).await?;
        debug!(task = %task.id, "task created");
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.storage
            .lock()
            .await
            .load_task(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    async fn move_task(
        &self,
        id: TaskId,
        status: TaskStatus,
        expected_version: u64,
    ) -> Result<Task> {
        self.mutate(id, expected_version, |task, now| {
            move_task(task, status, now);
            Ok(())
        })
        .await
    }

    async fn update_progress(
        &self,
        id: TaskId,
        progress: i64,
        expected_version: u64,
    ) -> Result<Task> {
        self.mutate(id, expected_version, |task, now| {
            if !(0..=100).contains(&progress) {
                return Err(EngineError::InvalidRange { value: progress });
            }
            task.progress = Some(progress as u8);
            task.updated_at = now;
            task.version += 1;
            Ok(())
        })
        .await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let all = self.storage.lock().await.list_tasks().await?;
        Ok(prodflow_query::apply_task_filter(&all, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        match self.storage.lock().await.delete_task(id).await {
            Ok(()) => {
                debug!(task = %id, "task deleted");
                Ok(())
            }
            Err(StorageError::NotFound(id)) => Err(EngineError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodflow_storage::MemoryStore;

    fn service() -> BasicBoardService<MemoryStore> {
        BasicBoardService::new(MemoryStore::new())
    }

    fn spec(title: &str) -> TaskSpec {
        TaskSpec {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            assignee: MemberId::new(),
            reviewer: None,
            tags: Vec::new(),
            due_date: None,
        }
    }

    #[test]
    fn any_column_move_is_permitted() {
        let now = Utc::now();
        let mut task = Task::new("t".into(), String::new(), Priority::Low, MemberId::new(), now);

        // Backlog straight to review, then back to backlog.
        move_task(&mut task, TaskStatus::Review, now);
        assert_eq!(task.status, TaskStatus::Review);
        move_task(&mut task, TaskStatus::Backlog, now);
        assert_eq!(task.status, TaskStatus::Backlog);
    }

    #[test]
    fn done_toggles_completed_date() {
        let now = Utc::now();
        let mut task = Task::new("t".into(), String::new(), Priority::Low, MemberId::new(), now);

        move_task(&mut task, TaskStatus::Done, now);
        assert_eq!(task.completed_date, Some(now));

        move_task(&mut task, TaskStatus::Todo, now);
        assert_eq!(task.completed_date, None);

        let later = now + chrono::Duration::hours(2);
        move_task(&mut task, TaskStatus::Done, later);
        assert_eq!(task.completed_date, Some(later));
    }

    #[test]
    fn staying_in_done_keeps_the_original_date() {
        let now = Utc::now();
        let mut task = Task::new("t".into(), String::new(), Priority::Low, MemberId::new(), now);

        move_task(&mut task, TaskStatus::Done, now);
        let later = now + chrono::Duration::hours(1);
        move_task(&mut task, TaskStatus::Done, later);
        assert_eq!(task.completed_date, Some(now));
    }

    #[test]
    fn unknown_column_name_is_an_illegal_transition() {
        let err = parse_column(TaskStatus::Todo, "archived").unwrap_err();
        match err {
            EngineError::IllegalTransition { from, to } => {
                assert_eq!(from, "todo");
                assert_eq!(to, "archived");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(parse_column(TaskStatus::Todo, "done").unwrap(), TaskStatus::Done);
    }

    #[tokio::test]
    async fn delete_removes_the_task() {
        let svc = service();
        let task = svc.create_task(spec("Cut trailer")).await.unwrap();

        svc.delete_task(task.id).await.unwrap();
        let err = svc.get_task(task.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = svc.delete_task(task.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn service_move_bumps_version() {
        let svc = service();
        let task = svc.create_task(spec("Cut trailer")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Backlog);
        assert_eq!(task.version, 1);

        let moved = svc.move_task(task.id, TaskStatus::InProgress, 1).await.unwrap();
        assert_eq!(moved.version, 2);
        assert_eq!(moved.status, TaskStatus::InProgress);

        let err = svc.move_task(task.id, TaskStatus::Done, 1).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
    }

    #[tokio::test]
    async fn progress_is_range_checked() {
        let svc = service();
        let task = svc.create_task(spec("Cut trailer")).await.unwrap();

        let err = svc.update_progress(task.id, 101, 1).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { value: 101 }));

        let ok = svc.update_progress(task.id, 100, 1).await.unwrap();
        assert_eq!(ok.progress, Some(100));
    }

    #[tokio::test]
    async fn list_applies_filters() {
        let svc = service();
        let a = svc.create_task(spec("Cut trailer")).await.unwrap();
        svc.create_task(spec("Write outline")).await.unwrap();

        svc.move_task(a.id, TaskStatus::Done, 1).await.unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let done = svc.list_tasks(&filter).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "Cut trailer");
    }
}
