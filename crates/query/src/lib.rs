//! Query & filter layer.
//!
//! Pure, read-only filtering over snapshots of projects or tasks for the
//! dashboard views. Filters compose by conjunction in the order
//! status → priority → search and never reorder their input (stable
//! filter, no implicit sort). All functions are total: empty input yields
//! empty output, never an error.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

use prodflow_core::{ContentProject, Priority, ProjectStatus, Task, TaskStatus};

/// An entity the filter layer can work over.
pub trait Filterable {
    /// The entity's status type.
    type Status: Copy + PartialEq;

    /// Current status.
    fn status(&self) -> Self::Status;

    /// Priority.
    fn priority(&self) -> Priority;

    /// Text fields searched by [`search`]: title first, then description.
    fn search_text(&self) -> [&str; 2];
}

impl Filterable for ContentProject {
    type Status = ProjectStatus;

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn search_text(&self) -> [&str; 2] {
        [&self.title, &self.description]
    }
}

impl Filterable for Task {
    type Status = TaskStatus;

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn search_text(&self) -> [&str; 2] {
        [&self.title, &self.description]
    }
}

/// Keep items with the given status. `None` means "all" and is a no-op.
pub fn filter_by_status<'a, T: Filterable>(
    items: impl IntoIterator<Item = &'a T>,
    status: Option<T::Status>,
) -> Vec<&'a T> {
    items
        .into_iter()
        .filter(|item| status.map_or(true, |s| item.status() == s))
        .collect()
}

/// Keep items with the given priority. `None` means "all" and is a no-op.
pub fn filter_by_priority<'a, T: Filterable>(
    items: impl IntoIterator<Item = &'a T>,
    priority: Option<Priority>,
) -> Vec<&'a T> {
    items
        .into_iter()
        .filter(|item| priority.map_or(true, |p| item.priority() == p))
        .collect()
}

/// Case-insensitive substring match against title and description.
/// An empty term is a no-op.
pub fn search<'a, T: Filterable>(
    items: impl IntoIterator<Item = &'a T>,
    term: &str,
) -> Vec<&'a T> {
    let term = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            term.is_empty()
                || item
                    .search_text()
                    .iter()
                    .any(|text| text.to_lowercase().contains(&term))
        })
        .collect()
}

/// Filter spec for project listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// Exact status match; `None` matches all
    pub status: Option<ProjectStatus>,

    /// Exact priority match; `None` matches all
    pub priority: Option<Priority>,

    /// Substring search term; `None` or empty matches all
    pub search: Option<String>,
}

/// Filter spec for task listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Exact column match; `None` matches all
    pub status: Option<TaskStatus>,

    /// Exact priority match; `None` matches all
    pub priority: Option<Priority>,

    /// Substring search term; `None` or empty matches all
    pub search: Option<String>,
}

/// Apply status, then priority, then search, preserving input order.
pub fn apply<'a, T: Filterable>(
    items: &'a [T],
    status: Option<T::Status>,
    priority: Option<Priority>,
    term: Option<&str>,
) -> Vec<&'a T> {
    let by_status = filter_by_status(items, status);
    let by_priority = filter_by_priority(by_status, priority);
    search(by_priority, term.unwrap_or(""))
}

/// Apply a [`ProjectFilter`] to a project snapshot.
pub fn apply_project_filter<'a>(
    items: &'a [ContentProject],
    filter: &ProjectFilter,
) -> Vec<&'a ContentProject> {
    apply(items, filter.status, filter.priority, filter.search.as_deref())
}

/// Apply a [`TaskFilter`] to a task snapshot.
pub fn apply_task_filter<'a>(items: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    apply(items, filter.status, filter.priority, filter.search.as_deref())
}
