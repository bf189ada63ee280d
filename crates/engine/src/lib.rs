//! Workflow engine.
//!
//! The write side of prodflow: stage-progress mutation, milestone
//! toggling, the project-status transition walk, and progress
//! aggregation, exposed both as standalone pure functions and through the
//! [`WorkflowService`] layer that persists via compare-and-swap.

#![warn(missing_docs)]

mod error;
mod progress;
mod transition;
mod service;

pub use error::{EngineError, Result};
pub use progress::{
    overall_progress, recompute_overall_progress, set_stage_progress, toggle_milestone,
};
pub use transition::{forward_next, set_status};
pub use service::{
    BasicWorkflowService, CollaborationEvent, MilestoneSpec, ProjectSpec, WorkflowService,
};
