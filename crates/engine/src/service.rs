//! Workflow service - the persistence-aware boundary of the engine.
//!
//! Each mutation is a short read-modify-write: load the document, check
//! the caller's `expected_version`, apply the pure mutation, and
//! compare-and-swap the result back. A stale version surfaces as
//! [`EngineError::Conflict`]; the engine never retries on the caller's
//! behalf.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use prodflow_analytics::AnalyticsReport;
use prodflow_core::{
    ContentProject, MemberId, Milestone, Priority, ProjectId, ProjectStatus, Schedule, StageName,
    TeamAssignment, Time,
};
use prodflow_query::ProjectFilter;
use prodflow_storage::{Directory, StorageError, Store};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::progress::{set_stage_progress, toggle_milestone};
use crate::transition::set_status;

/// Specification for creating a project.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Category
    pub category: String,
    /// Priority
    pub priority: Priority,
    /// Key dates (stored as given; ordering is not validated)
    pub schedule: Schedule,
    /// Estimated view count
    pub estimated_views: u64,
    /// Initial milestones
    pub milestones: Vec<MilestoneSpec>,
    /// Initial team assignments
    pub team: Vec<TeamAssignment>,
}

/// Specification for one milestone.
#[derive(Debug, Clone)]
pub struct MilestoneSpec {
    /// Title
    pub title: String,
    /// The canonical stage the milestone belongs to
    pub stage: StageName,
    /// Member responsible
    pub assignee: MemberId,
}

/// A collaboration counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaborationEvent {
    /// A comment was left
    Comment,
    /// A revision was requested
    Revision,
    /// An approval was given
    Approval,
}

/// Workflow service over a project store.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    /// Create a project from a spec.
    async fn create_project(&self, spec: ProjectSpec) -> Result<ContentProject>;

    /// Load a project.
    async fn get_project(&self, id: ProjectId) -> Result<ContentProject>;

    /// List projects matching the filter, as an owned snapshot.
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ContentProject>>;

    /// Delete a project.
    async fn delete_project(&self, id: ProjectId) -> Result<()>;

    /// Set a stage's progress (0-100).
    async fn update_stage_progress(
        &self,
        id: ProjectId,
        stage: StageName,
        progress: i64,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Assert a new lifecycle status.
    async fn set_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Toggle a milestone's completion flag.
    async fn toggle_milestone(
        &self,
        id: ProjectId,
        milestone_id: prodflow_core::MilestoneId,
        completed: bool,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Add a milestone to a project.
    async fn add_milestone(
        &self,
        id: ProjectId,
        spec: MilestoneSpec,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Upsert a team assignment (unique per member).
    async fn assign_member(
        &self,
        id: ProjectId,
        assignment: TeamAssignment,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Add a member to a stage's assigned set.
    async fn assign_to_stage(
        &self,
        id: ProjectId,
        stage: StageName,
        member: MemberId,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Bump a collaboration counter.
    async fn record_collaboration(
        &self,
        id: ProjectId,
        event: CollaborationEvent,
        expected_version: u64,
    ) -> Result<ContentProject>;

    /// Build the dashboard analytics report as of `now`.
    async fn analytics(&self, now: Time) -> Result<AnalyticsReport>;
}

/// Basic workflow service implementation.
pub struct BasicWorkflowService<S: Store> {
    storage: Arc<Mutex<S>>,
    directory: Option<Arc<dyn Directory>>,
}

impl<S: Store> Clone for BasicWorkflowService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            directory: self.directory.clone(),
        }
    }
}

impl<S: Store> BasicWorkflowService<S> {
    /// Create a new workflow service.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            directory: None,
        }
    }

    /// Attach a team directory; member references in assignments are then
    /// validated against it.
    pub fn with_directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = Some(directory);
        self
    }

    async fn check_member(&self, member: MemberId) -> Result<()> {
        if let Some(directory) = &self.directory {
            if directory.get_member(member).await?.is_none() {
                return Err(EngineError::NotFound(member.to_string()));
            }
        }
        Ok(())
    }

    /// Load, version-check, mutate, and CAS-write one project.
    async fn mutate<F>(&self, id: ProjectId, expected_version: u64, apply: F) -> Result<ContentProject>
    where
        F: FnOnce(&mut ContentProject, Time) -> Result<()> + Send,
    {
        let mut storage = self.storage.lock().await;
        let mut project = storage
            .load_project(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        if project.version != expected_version {
            return Err(EngineError::Conflict {
                expected: expected_version,
                actual: project.version,
            });
        }

        apply(&mut project, Utc::now())?;

        match storage.compare_and_swap_project(&project, expected_version).await {
            Ok(()) => {
                debug!(project = %id, version = project.version, "project mutated");
                Ok(project)
            }
            Err(StorageError::VersionConflict { expected, actual }) => {
                Err(EngineError::Conflict { expected, actual })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<S: Store + 'static> WorkflowService for BasicWorkflowService<S> {
    async fn create_project(&self, spec: ProjectSpec) -> Result<ContentProject> {
        for assignment in &spec.team {
            self.check_member(assignment.member).await?;
        }

        let now = Utc::now();
        let mut project = ContentProject::new(spec.title, spec.category, spec.priority, now);
        project.description = spec.description;
        project.schedule = spec.schedule;
        project.metrics.estimated_views = spec.estimated_views;
        project.milestones = spec
            .milestones
            .into_iter()
            .map(|m| Milestone::new(m.title, m.stage, m.assignee))
            .collect();
        project.team = spec.team;

        self.storage.lock().await.insert_project(&project).await?;
        debug!(project = %project.id, "project created");
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> Result<ContentProject> {
        self.storage
            .lock()
            .await
            .load_project(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ContentProject>> {
        let all = self.storage.lock().await.list_projects().await?;
        Ok(prodflow_query::apply_project_filter(&all, filter)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<()> {
        match self.storage.lock().await.delete_project(id).await {
            Ok(()) => {
                debug!(project = %id, "project deleted");
                Ok(())
            }
            Err(StorageError::NotFound(id)) => Err(EngineError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_stage_progress(
        &self,
        id: ProjectId,
        stage: StageName,
        progress: i64,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.mutate(id, expected_version, |project, now| {
            set_stage_progress(project, stage, progress, now)
        })
        .await
    }

    async fn set_project_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.mutate(id, expected_version, |project, now| {
            set_status(project, status, now)
        })
        .await
    }

    async fn toggle_milestone(
        &self,
        id: ProjectId,
        milestone_id: prodflow_core::MilestoneId,
        completed: bool,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.mutate(id, expected_version, |project, now| {
            toggle_milestone(project, milestone_id, completed, now)
        })
        .await
    }

    async fn add_milestone(
        &self,
        id: ProjectId,
        spec: MilestoneSpec,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.check_member(spec.assignee).await?;
        self.mutate(id, expected_version, |project, now| {
            project
                .milestones
                .push(Milestone::new(spec.title, spec.stage, spec.assignee));
            project.updated_at = now;
            project.version += 1;
            Ok(())
        })
        .await
    }

    async fn assign_member(
        &self,
        id: ProjectId,
        assignment: TeamAssignment,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.check_member(assignment.member).await?;
        self.mutate(id, expected_version, |project, now| {
            match project.team.iter().position(|a| a.member == assignment.member) {
                Some(i) => project.team[i] = assignment,
                None => project.team.push(assignment),
            }
            project.updated_at = now;
            project.version += 1;
            Ok(())
        })
        .await
    }

    async fn assign_to_stage(
        &self,
        id: ProjectId,
        stage: StageName,
        member: MemberId,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.check_member(member).await?;
        self.mutate(id, expected_version, |project, now| {
            if project.status.is_terminal() {
                return Err(EngineError::TerminalProject(project.status));
            }
            let assigned = &mut project.stages.get_mut(stage).assigned;
            if !assigned.contains(&member) {
                assigned.push(member);
            }
            project.updated_at = now;
            project.version += 1;
            Ok(())
        })
        .await
    }

    async fn record_collaboration(
        &self,
        id: ProjectId,
        event: CollaborationEvent,
        expected_version: u64,
    ) -> Result<ContentProject> {
        self.mutate(id, expected_version, |project, now| {
            let counters = &mut project.collaboration;
            match event {
                CollaborationEvent::Comment => counters.comments += 1,
                CollaborationEvent::Revision => counters.revisions += 1,
                CollaborationEvent::Approval => counters.approvals += 1,
            }
            project.updated_at = now;
            project.version += 1;
            Ok(())
        })
        .await
    }

    async fn analytics(&self, now: Time) -> Result<AnalyticsReport> {
        let all = self.storage.lock().await.list_projects().await?;
        Ok(prodflow_analytics::report(&all, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodflow_core::TeamRole;
    use prodflow_storage::MemoryStore;

    fn service() -> BasicWorkflowService<MemoryStore> {
        BasicWorkflowService::new(MemoryStore::new())
    }

    fn spec(title: &str) -> ProjectSpec {
        ProjectSpec {
            title: title.to_string(),
            description: String::new(),
            category: "tutorial".to_string(),
            priority: Priority::Medium,
            schedule: Schedule::default(),
            estimated_views: 10_000,
            milestones: Vec::new(),
            team: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_starts_at_version_one() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        assert_eq!(project.version, 1);
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.overall_progress, 0);
        assert_eq!(project.stages.iter().count(), 6);
    }

    #[tokio::test]
    async fn stage_update_bumps_version_and_aggregates() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        let updated = svc
            .update_stage_progress(project.id, StageName::Recording, 100, 1)
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.overall_progress, 17); // round(100/6)

        let stored = svc.get_project(project.id).await.unwrap();
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent_in_content() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        let first = svc
            .update_stage_progress(project.id, StageName::Editing, 60, 1)
            .await
            .unwrap();
        let second = svc
            .update_stage_progress(project.id, StageName::Editing, 60, first.version)
            .await
            .unwrap();

        // Version still advances; the content does not change.
        assert_eq!(second.version, first.version + 1);
        assert_eq!(second.overall_progress, first.overall_progress);
        assert_eq!(
            second.stages.get(StageName::Editing).progress,
            first.stages.get(StageName::Editing).progress
        );
    }

    #[tokio::test]
    async fn stale_version_conflicts() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        svc.update_stage_progress(project.id, StageName::Editing, 10, 1)
            .await
            .unwrap();
        let err = svc
            .update_stage_progress(project.id, StageName::Editing, 20, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict { expected: 1, actual: 2 }));
    }

    #[tokio::test]
    async fn concurrent_writers_exactly_one_wins() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        let a = svc.clone();
        let b = svc.clone();
        let id = project.id;
        let (ra, rb) = tokio::join!(
            a.update_stage_progress(id, StageName::Editing, 50, 1),
            b.update_stage_progress(id, StageName::Recording, 30, 1),
        );

        let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let conflict = if ra.is_err() { ra.unwrap_err() } else { rb.unwrap_err() };
        assert!(matches!(conflict, EngineError::Conflict { .. }));
    }

    #[tokio::test]
    async fn delete_removes_the_project() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        svc.delete_project(project.id).await.unwrap();
        let err = svc.get_project(project.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = svc.delete_project(project.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_project_is_not_found() {
        let svc = service();
        let err = svc.get_project(ProjectId::new()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn milestone_flow_through_the_service() {
        let svc = service();
        let assignee = MemberId::new();
        let mut s = spec("Drone shots");
        s.milestones.push(MilestoneSpec {
            title: "Script locked".to_string(),
            stage: StageName::ScriptWriting,
            assignee,
        });
        let project = svc.create_project(s).await.unwrap();
        let milestone_id = project.milestones[0].id;

        let updated = svc
            .toggle_milestone(project.id, milestone_id, true, 1)
            .await
            .unwrap();
        assert!(updated.milestones[0].completed);
        assert!(updated.milestones[0].completed_at.is_some());
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn terminal_transition_law() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        let cancelled = svc
            .set_project_status(project.id, ProjectStatus::Cancelled, 1)
            .await
            .unwrap();
        let err = svc
            .set_project_status(project.id, ProjectStatus::Draft, cancelled.version)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition { .. }));

        let err = svc
            .update_stage_progress(project.id, StageName::Editing, 10, cancelled.version)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::TerminalProject(_)));
    }

    #[tokio::test]
    async fn assignments_and_collaboration_counters() {
        let svc = service();
        let project = svc.create_project(spec("Drone shots")).await.unwrap();
        let member = MemberId::new();

        let v2 = svc
            .assign_member(
                project.id,
                TeamAssignment {
                    member,
                    role: TeamRole::Editor,
                    estimated_hours: 8.0,
                    priority: Priority::High,
                },
                1,
            )
            .await
            .unwrap();
        assert_eq!(v2.team.len(), 1);

        // Upsert replaces, not duplicates.
        let v3 = svc
            .assign_member(
                project.id,
                TeamAssignment {
                    member,
                    role: TeamRole::Reviewer,
                    estimated_hours: 2.0,
                    priority: Priority::Low,
                },
                v2.version,
            )
            .await
            .unwrap();
        assert_eq!(v3.team.len(), 1);
        assert_eq!(v3.team[0].role, TeamRole::Reviewer);

        let v4 = svc
            .assign_to_stage(project.id, StageName::Editing, member, v3.version)
            .await
            .unwrap();
        assert_eq!(v4.stages.get(StageName::Editing).assigned, vec![member]);

        let v5 = svc
            .record_collaboration(project.id, CollaborationEvent::Comment, v4.version)
            .await
            .unwrap();
        assert_eq!(v5.collaboration.comments, 1);
    }

    #[tokio::test]
    async fn directory_validates_member_refs() {
        use prodflow_storage::MemoryDirectory;

        let known = prodflow_core::TeamMember {
            id: MemberId::new(),
            name: "Rae".to_string(),
            title: "Creator".to_string(),
            email: None,
        };
        let svc = BasicWorkflowService::new(MemoryStore::new())
            .with_directory(Arc::new(MemoryDirectory::new(vec![known.clone()])));
        let project = svc.create_project(spec("Drone shots")).await.unwrap();

        let err = svc
            .assign_to_stage(project.id, StageName::Editing, MemberId::new(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        svc.assign_to_stage(project.id, StageName::Editing, known.id, 1)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn analytics_over_the_store() {
        let svc = service();
        svc.create_project(spec("A")).await.unwrap();
        svc.create_project(spec("B")).await.unwrap();

        let report = svc.analytics(Utc::now()).await.unwrap();
        let draft = report
            .status_distribution
            .iter()
            .find(|s| s.status == ProjectStatus::Draft)
            .unwrap();
        assert_eq!(draft.count, 2);
        assert_eq!(draft.percentage, 100);
        assert!(report.upcoming_deadlines.is_empty());
    }
}
