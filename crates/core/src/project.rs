//! Content project model - a piece of content moving through production.

use serde::{Deserialize, Serialize};

use crate::id::ProjectId;
use crate::milestone::Milestone;
use crate::stage::StageSet;
use crate::team::TeamAssignment;
use crate::Time;

/// A content project and all of its workflow state.
///
/// `overall_progress`, stage statuses, and `version` are derived or
/// engine-maintained; callers mutate through the engine, never by writing
/// these fields directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentProject {
    /// Unique identifier
    pub id: ProjectId,

    /// Title
    pub title: String,

    /// Short description shown on dashboards
    pub description: String,

    /// Content category (free-form, e.g. "tutorial")
    pub category: String,

    /// Priority
    pub priority: Priority,

    /// Lifecycle status, caller-asserted within the legal transition walk
    pub status: ProjectStatus,

    /// Derived: rounded mean of all stage progress values
    pub overall_progress: u8,

    /// The six production stages
    pub stages: StageSet,

    /// Milestones, each tagged with the stage it belongs to
    pub milestones: Vec<Milestone>,

    /// Team assignments, unique per member
    pub team: Vec<TeamAssignment>,

    /// Key dates
    pub schedule: Schedule,

    /// Performance metrics
    pub metrics: Metrics,

    /// Collaboration counters
    pub collaboration: Collaboration,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,

    /// Monotonic counter for optimistic concurrency
    pub version: u64,
}

impl ContentProject {
    /// Create a fresh project in `draft` at version 1, all stages pending.
    pub fn new(title: String, category: String, priority: Priority, now: Time) -> Self {
        Self {
            id: ProjectId::new(),
            title,
            description: String::new(),
            category,
            priority,
            status: ProjectStatus::Draft,
            overall_progress: 0,
            stages: StageSet::default(),
            milestones: Vec::new(),
            team: Vec::new(),
            schedule: Schedule::default(),
            metrics: Metrics::default(),
            collaboration: Collaboration::default(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

/// Priority level shared by projects, tasks, and assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
    /// Urgent
    Urgent,
}

impl Priority {
    /// Wire name (lowercase, matching the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project lifecycle status.
///
/// Legal transitions walk forward through
/// draft → recording → editing → review → approved → published, with
/// `cancelled` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Draft
    Draft,
    /// Recording
    Recording,
    /// Editing
    Editing,
    /// Review
    Review,
    /// Approved
    Approved,
    /// Published (terminal)
    Published,
    /// Cancelled (terminal)
    Cancelled,
}

impl ProjectStatus {
    /// All statuses, in lifecycle order (terminals last).
    pub const ALL: [ProjectStatus; 7] = [
        ProjectStatus::Draft,
        ProjectStatus::Recording,
        ProjectStatus::Editing,
        ProjectStatus::Review,
        ProjectStatus::Approved,
        ProjectStatus::Published,
        ProjectStatus::Cancelled,
    ];

    /// Terminal statuses accept no further stage mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Published | ProjectStatus::Cancelled)
    }

    /// Wire name (lowercase, matching the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Recording => "recording",
            ProjectStatus::Editing => "editing",
            ProjectStatus::Review => "review",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Published => "published",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key dates for a project.
///
/// Chronological ordering across the three dates is not validated; the
/// engine stores whatever the caller supplies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Planned recording date
    pub recording_date: Option<Time>,

    /// Editing deadline
    pub editing_deadline: Option<Time>,

    /// Planned publish date
    pub publish_date: Option<Time>,
}

/// Performance metrics for a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Estimated view count
    pub estimated_views: u64,

    /// Actual view count, once published
    pub actual_views: Option<u64>,

    /// Engagement rate, once published
    pub engagement_rate: Option<f32>,

    /// Days from creation to publication
    pub completion_days: Option<u32>,
}

/// Collaboration counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Collaboration {
    /// Comment count
    pub comments: u32,

    /// Revision count
    pub revisions: u32,

    /// Approval count
    pub approvals: u32,
}
