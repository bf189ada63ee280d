//! Project status transitions.
//!
//! Status is caller-asserted, not derived from progress, but constrained
//! to a forward-or-cancel walk:
//! draft → recording → editing → review → approved → published, with
//! `cancelled` reachable from any non-terminal state.

use prodflow_core::{ContentProject, ProjectStatus, Time};

use crate::error::{EngineError, Result};

/// The next status on the forward walk, if any.
pub fn forward_next(status: ProjectStatus) -> Option<ProjectStatus> {
    match status {
        ProjectStatus::Draft => Some(ProjectStatus::Recording),
        ProjectStatus::Recording => Some(ProjectStatus::Editing),
        ProjectStatus::Editing => Some(ProjectStatus::Review),
        ProjectStatus::Review => Some(ProjectStatus::Approved),
        ProjectStatus::Approved => Some(ProjectStatus::Published),
        ProjectStatus::Published | ProjectStatus::Cancelled => None,
    }
}

/// Assert a new project status.
///
/// Fails with [`EngineError::IllegalTransition`] when the project is
/// already terminal or the target is neither forward-adjacent nor
/// `cancelled`. Entering `published` backfills
/// `metrics.completion_days` from the project's age when not already
/// recorded.
pub fn set_status(project: &mut ContentProject, new_status: ProjectStatus, now: Time) -> Result<()> {
    let current = project.status;
    let legal = !current.is_terminal()
        && (new_status == ProjectStatus::Cancelled || forward_next(current) == Some(new_status));
    if !legal {
        return Err(EngineError::IllegalTransition {
            from: current.to_string(),
            to: new_status.to_string(),
        });
    }

    project.status = new_status;
    if new_status == ProjectStatus::Published && project.metrics.completion_days.is_none() {
        let days = (now - project.created_at).num_days().max(0) as u32;
        project.metrics.completion_days = Some(days);
    }
    project.updated_at = now;
    project.version += 1;
    Ok(())
}
