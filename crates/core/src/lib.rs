//! prodflow core data models.
//!
//! This crate defines the entities that move through the content
//! production workflow: projects with their six fixed stages,
//! milestones, team assignments, and the simpler ad-hoc task board.

#![warn(missing_docs)]

// Core identities
mod id;

// Production workflow
mod project;
mod stage;
mod milestone;
mod team;

// Ad-hoc task board
mod task;

// Team directory entity
mod member;

// Re-exports
pub use id::*;

// Project & stages
pub use project::{
    Collaboration, ContentProject, Metrics, Priority, ProjectStatus, Schedule,
};
pub use stage::{ProductionStage, StageName, StageSet, StageStatus, UnknownStage};
pub use milestone::Milestone;
pub use team::{TeamAssignment, TeamRole};

// Task board
pub use task::{Task, TaskStatus, UnknownColumn};

// Directory
pub use member::TeamMember;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
