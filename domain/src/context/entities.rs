//! Shared context entity.

use super::value_objects::{ArtifactStats, ContextField, ContextPatch};
use serde::{Deserialize, Serialize};

/// The single shared project state every agent reads and mutates.
///
/// There is always exactly one artifact; a blank name and blank content is
/// simply an empty artifact. Fields are never optional, they default to the
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextState {
    pub objective: String,
    pub scratchpad: String,
    pub artifact_name: String,
    pub artifact_content: String,
}

impl ContextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_scratchpad(mut self, scratchpad: impl Into<String>) -> Self {
        self.scratchpad = scratchpad.into();
        self
    }

    pub fn with_artifact(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self.artifact_content = content.into();
        self
    }

    /// Read a single field by name.
    pub fn field(&self, field: ContextField) -> &str {
        match field {
            ContextField::Objective => &self.objective,
            ContextField::Scratchpad => &self.scratchpad,
            ContextField::ArtifactName => &self.artifact_name,
            ContextField::ArtifactContent => &self.artifact_content,
        }
    }

    fn field_mut(&mut self, field: ContextField) -> &mut String {
        match field {
            ContextField::Objective => &mut self.objective,
            ContextField::Scratchpad => &mut self.scratchpad,
            ContextField::ArtifactName => &mut self.artifact_name,
            ContextField::ArtifactContent => &mut self.artifact_content,
        }
    }

    /// Merge the provided fields of `patch` into this state.
    ///
    /// Omitted fields are left untouched. Returns the fields whose value
    /// actually changed, in declaration order; writing an identical value
    /// is not reported.
    pub fn apply(&mut self, patch: &ContextPatch) -> Vec<ContextField> {
        let mut changed = Vec::new();
        for (field, value) in patch.entries() {
            let slot = self.field_mut(field);
            if slot.as_str() != value {
                *slot = value.to_string();
                changed.push(field);
            }
        }
        changed
    }

    /// Size summary of the active artifact.
    pub fn artifact_stats(&self) -> ArtifactStats {
        ArtifactStats::of(&self.artifact_name, &self.artifact_content)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
