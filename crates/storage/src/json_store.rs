//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON document per entity under
//! `projects/` and `tasks/` subdirectories. The entity's own `version`
//! field is the compare-and-swap token: a swap re-reads the current
//! document and rejects the write if the stored version has advanced.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use prodflow_core::{ContentProject, ProjectId, Task, TaskId};
use tokio::fs;
use tracing::debug;

use super::{Result, StorageError, Store};

/// File-based JSON storage backend.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create storage rooted at `root`, creating the entity directories.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("projects")).await?;
        fs::create_dir_all(root.join("tasks")).await?;
        Ok(Self { root })
    }

    fn project_path(&self, id: ProjectId) -> PathBuf {
        self.root.join("projects").join(format!("{}.json", id))
    }

    fn task_path(&self, id: TaskId) -> PathBuf {
        self.root.join("tasks").join(format!("{}.json", id))
    }

    async fn read_doc<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_doc<T: serde::Serialize>(path: &Path, doc: &T) -> Result<()> {
        let body = serde_json::to_string_pretty(doc)?;
        fs::write(path, body.as_bytes()).await?;
        Ok(())
    }

    async fn list_dir<T: serde::de::DeserializeOwned>(&self, dir: &str) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut entries = fs::read_dir(self.root.join(dir)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(doc) = Self::read_doc(&path).await? {
                out.push(doc);
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Store for JsonStore {
    async fn insert_project(&mut self, project: &ContentProject) -> Result<()> {
        let path = self.project_path(project.id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::AlreadyExists(project.id.to_string()));
        }
        debug!(project = %project.id, "insert project");
        Self::write_doc(&path, project).await
    }

    async fn load_project(&self, id: ProjectId) -> Result<Option<ContentProject>> {
        Self::read_doc(&self.project_path(id)).await
    }

    async fn compare_and_swap_project(
        &mut self,
        project: &ContentProject,
        expected_version: u64,
    ) -> Result<()> {
        let path = self.project_path(project.id);
        let stored: ContentProject = Self::read_doc(&path)
            .await?
            .ok_or_else(|| StorageError::NotFound(project.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StorageError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }
        debug!(project = %project.id, version = project.version, "swap project");
        Self::write_doc(&path, project).await
    }

    async fn list_projects(&self) -> Result<Vec<ContentProject>> {
        self.list_dir("projects").await
    }

    async fn delete_project(&mut self, id: ProjectId) -> Result<()> {
        let path = self.project_path(id);
        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn insert_task(&mut self, task: &Task) -> Result<()> {
        let path = self.task_path(task.id);
        if fs::try_exists(&path).await? {
            return Err(StorageError::AlreadyExists(task.id.to_string()));
        }
        debug!(task = %task.id, "insert task");
        Self::write_doc(&path, task).await
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        Self::read_doc(&self.task_path(id)).await
    }

    async fn compare_and_swap_task(&mut self, task: &Task, expected_version: u64) -> Result<()> {
        let path = self.task_path(task.id);
        let stored: Task = Self::read_doc(&path)
            .await?
            .ok_or_else(|| StorageError::NotFound(task.id.to_string()))?;
        if stored.version != expected_version {
            return Err(StorageError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }
        debug!(task = %task.id, version = task.version, "swap task");
        Self::write_doc(&path, task).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.list_dir("tasks").await
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let path = self.task_path(id);
        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(path).await?;
        Ok(())
    }
}
