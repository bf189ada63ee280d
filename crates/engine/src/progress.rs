//! Stage progress engine and progress aggregation.
//!
//! These are the pure mutation functions; persistence and concurrency
//! control live in the service layer. Each successful mutation bumps the
//! project version and refreshes `updated_at`.

use prodflow_core::{ContentProject, MilestoneId, StageName, StageSet, StageStatus, Time};

use crate::error::{EngineError, Result};

/// Overall progress: rounded mean of all stage progress values.
pub fn overall_progress(stages: &StageSet) -> u8 {
    let (sum, count) = stages
        .iter()
        .fold((0u32, 0u32), |(sum, count), (_, stage)| {
            (sum + stage.progress as u32, count + 1)
        });
    (sum as f64 / count as f64).round() as u8
}

/// Rewrite a project's derived `overall_progress` from its stages.
///
/// Runs automatically after every stage mutation; callable standalone for
/// batch repair of loaded documents.
pub fn recompute_overall_progress(project: &mut ContentProject) {
    project.overall_progress = overall_progress(&project.stages);
}

/// Set a stage's progress and rederive everything that hangs off it.
///
/// Rejects values outside [0, 100] and any mutation on a terminal
/// project. On success the stage status is rederived, the overall
/// progress recomputed, and the version bumped.
pub fn set_stage_progress(
    project: &mut ContentProject,
    stage: StageName,
    progress: i64,
    now: Time,
) -> Result<()> {
    if project.status.is_terminal() {
        return Err(EngineError::TerminalProject(project.status));
    }
    if !(0..=100).contains(&progress) {
        return Err(EngineError::InvalidRange { value: progress });
    }

    let slot = project.stages.get_mut(stage);
    slot.progress = progress as u8;
    slot.status = StageStatus::for_progress(slot.progress);

    recompute_overall_progress(project);
    project.updated_at = now;
    project.version += 1;
    Ok(())
}

/// Toggle a milestone's completion flag.
///
/// `completed_at` is set exactly on the false→true transition and cleared
/// on true→false; re-asserting the current value leaves it untouched.
/// Milestones never drive stage progress.
pub fn toggle_milestone(
    project: &mut ContentProject,
    milestone_id: MilestoneId,
    completed: bool,
    now: Time,
) -> Result<()> {
    let milestone = project
        .milestones
        .iter_mut()
        .find(|m| m.id == milestone_id)
        .ok_or_else(|| EngineError::NotFound(milestone_id.to_string()))?;

    if completed && !milestone.completed {
        milestone.completed_at = Some(now);
    } else if !completed && milestone.completed {
        milestone.completed_at = None;
    }
    milestone.completed = completed;

    project.updated_at = now;
    project.version += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodflow_core::{MemberId, Milestone, Priority, ProjectStatus};

    fn sample_project() -> ContentProject {
        ContentProject::new(
            "Street food tour".to_string(),
            "vlog".to_string(),
            Priority::High,
            chrono::Utc::now(),
        )
    }

    #[test]
    fn scenario_recording_done_editing_half() {
        let mut project = sample_project();
        let now = chrono::Utc::now();

        set_stage_progress(&mut project, StageName::Recording, 100, now).unwrap();
        set_stage_progress(&mut project, StageName::Editing, 50, now).unwrap();

        // round(150 / 6) == 25
        assert_eq!(project.overall_progress, 25);
        assert_eq!(
            project.stages.get(StageName::Recording).status,
            StageStatus::Completed
        );
        assert_eq!(
            project.stages.get(StageName::Editing).status,
            StageStatus::InProgress
        );
        assert_eq!(
            project.stages.get(StageName::Review).status,
            StageStatus::Pending
        );
    }

    #[test]
    fn overall_progress_is_mean_after_any_mutation() {
        let mut project = sample_project();
        let now = chrono::Utc::now();

        for (i, stage) in StageName::CANONICAL.into_iter().enumerate() {
            set_stage_progress(&mut project, stage, (i as i64) * 17 % 101, now).unwrap();
            let mean: f64 = project
                .stages
                .iter()
                .map(|(_, s)| s.progress as f64)
                .sum::<f64>()
                / 6.0;
            assert_eq!(project.overall_progress, mean.round() as u8);
        }
    }

    #[test]
    fn progress_boundaries() {
        let mut project = sample_project();
        let now = chrono::Utc::now();

        assert!(matches!(
            set_stage_progress(&mut project, StageName::Editing, -1, now),
            Err(EngineError::InvalidRange { value: -1 })
        ));
        assert!(matches!(
            set_stage_progress(&mut project, StageName::Editing, 101, now),
            Err(EngineError::InvalidRange { value: 101 })
        ));
        set_stage_progress(&mut project, StageName::Editing, 0, now).unwrap();
        set_stage_progress(&mut project, StageName::Editing, 100, now).unwrap();
    }

    #[test]
    fn rejected_mutation_leaves_project_unchanged() {
        let mut project = sample_project();
        let now = chrono::Utc::now();
        let before_version = project.version;

        let _ = set_stage_progress(&mut project, StageName::Editing, 101, now);
        assert_eq!(project.version, before_version);
        assert_eq!(project.stages.get(StageName::Editing).progress, 0);
    }

    #[test]
    fn terminal_project_rejects_stage_mutation() {
        let mut project = sample_project();
        let now = chrono::Utc::now();

        project.status = ProjectStatus::Published;
        assert!(matches!(
            set_stage_progress(&mut project, StageName::Editing, 10, now),
            Err(EngineError::TerminalProject(ProjectStatus::Published))
        ));

        project.status = ProjectStatus::Cancelled;
        assert!(matches!(
            set_stage_progress(&mut project, StageName::Editing, 10, now),
            Err(EngineError::TerminalProject(ProjectStatus::Cancelled))
        ));
    }

    #[test]
    fn milestone_toggle_drives_completed_at() {
        let mut project = sample_project();
        let milestone = Milestone::new(
            "Script approved".to_string(),
            StageName::ScriptWriting,
            MemberId::new(),
        );
        let id = milestone.id;
        project.milestones.push(milestone);

        let now = chrono::Utc::now();
        toggle_milestone(&mut project, id, true, now).unwrap();
        assert_eq!(project.milestones[0].completed_at, Some(now));

        // Re-asserting true keeps the original timestamp.
        let later = now + chrono::Duration::hours(1);
        toggle_milestone(&mut project, id, true, later).unwrap();
        assert_eq!(project.milestones[0].completed_at, Some(now));

        toggle_milestone(&mut project, id, false, later).unwrap();
        assert!(!project.milestones[0].completed);
        assert_eq!(project.milestones[0].completed_at, None);
    }

    #[test]
    fn milestone_toggle_never_touches_stage_progress() {
        let mut project = sample_project();
        let now = chrono::Utc::now();
        set_stage_progress(&mut project, StageName::ScriptWriting, 40, now).unwrap();

        let milestone = Milestone::new(
            "Outline done".to_string(),
            StageName::ScriptWriting,
            MemberId::new(),
        );
        let id = milestone.id;
        project.milestones.push(milestone);

        toggle_milestone(&mut project, id, true, now).unwrap();
        assert_eq!(project.stages.get(StageName::ScriptWriting).progress, 40);
        assert_eq!(project.overall_progress, 7); // round(40/6)
    }

    #[test]
    fn unknown_milestone_is_not_found() {
        let mut project = sample_project();
        let err = toggle_milestone(&mut project, MilestoneId::new(), true, chrono::Utc::now())
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
