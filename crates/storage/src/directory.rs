//! Read-only team directory lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use prodflow_core::{MemberId, TeamMember};

use super::Result;

/// Team-member lookup by reference id.
///
/// The workflow engine only ever reads from the directory; member records
/// are owned elsewhere.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up a member by id.
    async fn get_member(&self, id: MemberId) -> Result<Option<TeamMember>>;
}

/// Fixed in-memory directory.
pub struct MemoryDirectory {
    members: HashMap<MemberId, TeamMember>,
}

impl MemoryDirectory {
    /// Build a directory from a member list.
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self {
            members: members.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn get_member(&self, id: MemberId) -> Result<Option<TeamMember>> {
        Ok(self.members.get(&id).cloned())
    }
}
