//! Team assignment model.

use serde::{Deserialize, Serialize};

use crate::id::MemberId;
use crate::project::Priority;

/// One member's assignment to a project. Unique per member within a team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssignment {
    /// The assigned member
    pub member: MemberId,

    /// Role on this project
    pub role: TeamRole,

    /// Estimated effort in hours
    pub estimated_hours: f32,

    /// Priority of this assignment for the member
    pub priority: Priority,
}

/// Production roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamRole {
    /// Creator
    Creator,
    /// Editor
    Editor,
    /// Reviewer
    Reviewer,
    /// Thumbnail designer
    ThumbnailDesigner,
    /// Content strategist
    ContentStrategist,
}
