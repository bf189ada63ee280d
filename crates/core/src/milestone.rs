//! Milestone model - completable checkpoints attached to a stage.

use serde::{Deserialize, Serialize};

use crate::id::{MemberId, MilestoneId};
use crate::stage::StageName;
use crate::Time;

/// A named checkpoint within a project.
///
/// Milestones are tracked independently of stage progress; completing one
/// never moves a stage's progress and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier
    pub id: MilestoneId,

    /// Title
    pub title: String,

    /// The canonical stage this milestone belongs to
    pub stage: StageName,

    /// Whether the milestone is done
    pub completed: bool,

    /// Set exactly when `completed` flips false→true, cleared on true→false
    pub completed_at: Option<Time>,

    /// Member responsible
    pub assignee: MemberId,
}

impl Milestone {
    /// Create an open milestone.
    pub fn new(title: String, stage: StageName, assignee: MemberId) -> Self {
        Self {
            id: MilestoneId::new(),
            title,
            stage,
            completed: false,
            completed_at: None,
            assignee,
        }
    }
}
