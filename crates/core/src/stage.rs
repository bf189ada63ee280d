//! Production stages - the six fixed steps every project passes through.

use serde::{Deserialize, Serialize};

use crate::MemberId;

/// Canonical stage names, in production order.
///
/// The sequence is fixed; projects always carry exactly these six stages
/// and iteration is always in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageName {
    /// Script writing
    ScriptWriting,
    /// Recording
    Recording,
    /// Editing
    Editing,
    /// Thumbnail design
    ThumbnailDesign,
    /// Review
    Review,
    /// Publishing
    Publishing,
}

impl StageName {
    /// All stages in canonical production order.
    pub const CANONICAL: [StageName; 6] = [
        StageName::ScriptWriting,
        StageName::Recording,
        StageName::Editing,
        StageName::ThumbnailDesign,
        StageName::Review,
        StageName::Publishing,
    ];

    /// Wire name (camelCase, matching the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::ScriptWriting => "scriptWriting",
            StageName::Recording => "recording",
            StageName::Editing => "editing",
            StageName::ThumbnailDesign => "thumbnailDesign",
            StageName::Review => "review",
            StageName::Publishing => "publishing",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a stage name outside the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(pub String);

impl std::str::FromStr for StageName {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageName::CANONICAL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// Status of a single stage, derived from its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// No work done yet (progress 0)
    Pending,
    /// Work underway (progress 1-99)
    InProgress,
    /// Done (progress 100)
    Completed,
}

impl StageStatus {
    /// Derive the status for a progress value.
    ///
    /// This is the only way a stage status comes into existence; callers
    /// never write the status field directly.
    pub fn for_progress(progress: u8) -> Self {
        match progress {
            0 => StageStatus::Pending,
            100 => StageStatus::Completed,
            _ => StageStatus::InProgress,
        }
    }
}

/// One stage of a content project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionStage {
    /// Members assigned to this stage
    pub assigned: Vec<MemberId>,

    /// Percentage complete (0-100), the only caller-settable field
    pub progress: u8,

    /// Derived status, rewritten on every progress change
    pub status: StageStatus,
}

impl Default for ProductionStage {
    fn default() -> Self {
        Self {
            assigned: Vec::new(),
            progress: 0,
            status: StageStatus::Pending,
        }
    }
}

/// The full, fixed set of stages for a project.
///
/// Exactly one slot per canonical stage; there is no way to add, remove,
/// or reorder stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSet {
    /// Script writing stage
    pub script_writing: ProductionStage,
    /// Recording stage
    pub recording: ProductionStage,
    /// Editing stage
    pub editing: ProductionStage,
    /// Thumbnail design stage
    pub thumbnail_design: ProductionStage,
    /// Review stage
    pub review: ProductionStage,
    /// Publishing stage
    pub publishing: ProductionStage,
}

impl StageSet {
    /// Borrow a stage by name.
    pub fn get(&self, name: StageName) -> &ProductionStage {
        match name {
            StageName::ScriptWriting => &self.script_writing,
            StageName::Recording => &self.recording,
            StageName::Editing => &self.editing,
            StageName::ThumbnailDesign => &self.thumbnail_design,
            StageName::Review => &self.review,
            StageName::Publishing => &self.publishing,
        }
    }

    /// Mutably borrow a stage by name.
    pub fn get_mut(&mut self, name: StageName) -> &mut ProductionStage {
        match name {
            StageName::ScriptWriting => &mut self.script_writing,
            StageName::Recording => &mut self.recording,
            StageName::Editing => &mut self.editing,
            StageName::ThumbnailDesign => &mut self.thumbnail_design,
            StageName::Review => &mut self.review,
            StageName::Publishing => &mut self.publishing,
        }
    }

    /// Iterate stages in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (StageName, &ProductionStage)> + '_ {
        StageName::CANONICAL.into_iter().map(move |name| (name, self.get(name)))
    }
}
