//! In-memory storage implementation, used as the test double.

use std::collections::HashMap;

use async_trait::async_trait;
use prodflow_core::{ContentProject, ProjectId, Task, TaskId};

use super::{Result, StorageError, Store};

/// HashMap-backed store with the same compare-and-swap semantics as the
/// file backend.
#[derive(Default)]
pub struct MemoryStore {
    projects: HashMap<ProjectId, ContentProject>,
    tasks: HashMap<TaskId, Task>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_project(&mut self, project: &ContentProject) -> Result<()> {
        if self.projects.contains_key(&project.id) {
            return Err(StorageError::AlreadyExists(project.id.to_string()));
        }
        self.projects.insert(project.id, project.clone());
        Ok(())
    }

    async fn load_project(&self, id: ProjectId) -> Result<Option<ContentProject>> {
        Ok(self.projects.get(&id).cloned())
    }

    async fn compare_and_swap_project(
        &mut self,
        project: &ContentProject,
        expected_version: u64,
    ) -> Result<()> {
        let stored = self
            .projects
            .get_mut(&project.id)
            .ok_or_else(|| StorageError::NotFound(project.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StorageError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }
        *stored = project.clone();
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<ContentProject>> {
        Ok(self.projects.values().cloned().collect())
    }

    async fn delete_project(&mut self, id: ProjectId) -> Result<()> {
        self.projects
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn insert_task(&mut self, task: &Task) -> Result<()> {
        if self.tasks.contains_key(&task.id) {
            return Err(StorageError::AlreadyExists(task.id.to_string()));
        }
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.get(&id).cloned())
    }

    async fn compare_and_swap_task(&mut self, task: &Task, expected_version: u64) -> Result<()> {
        let stored = self
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| StorageError::NotFound(task.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StorageError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }
        *stored = task.clone();
        Ok(())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.values().cloned().collect())
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodflow_core::Priority;

    fn sample_project() -> ContentProject {
        ContentProject::new(
            "Studio setup".to_string(),
            "tutorial".to_string(),
            Priority::High,
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_then_load() {
        let mut store = MemoryStore::new();
        let project = sample_project();
        store.insert_project(&project).await.unwrap();

        let loaded = store.load_project(project.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Studio setup");
        assert_eq!(loaded.version, 1);
    }

    #[tokio::test]
    async fn double_insert_fails() {
        let mut store = MemoryStore::new();
        let project = sample_project();
        store.insert_project(&project).await.unwrap();
        let err = store.insert_project(&project).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn cas_rejects_stale_version() {
        let mut store = MemoryStore::new();
        let mut project = sample_project();
        store.insert_project(&project).await.unwrap();

        // First writer wins.
        project.version = 2;
        store.compare_and_swap_project(&project, 1).await.unwrap();

        // Second writer still holds version 1.
        let mut stale = project.clone();
        stale.version = 2;
        let err = store.compare_and_swap_project(&stale, 1).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionConflict { expected: 1, actual: 2 }
        ));
    }
}
