//! Team member identity.
//!
//! The directory is read-only from the engine's perspective; the engine
//! holds member references but never mutates member records.

use serde::{Deserialize, Serialize};

use crate::id::MemberId;

/// A member of the content-production team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// Unique identifier
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Job title
    pub title: String,

    /// Contact email
    pub email: Option<String>,
}
