//! Context value objects: field names, partial updates and artifact stats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fields of [`ContextState`](super::ContextState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    Objective,
    Scratchpad,
    ArtifactName,
    ArtifactContent,
}

impl ContextField {
    pub const ALL: [ContextField; 4] = [
        ContextField::Objective,
        ContextField::Scratchpad,
        ContextField::ArtifactName,
        ContextField::ArtifactContent,
    ];

    /// Wire name used in tool arguments and persisted JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextField::Objective => "objective",
            ContextField::Scratchpad => "scratchpad",
            ContextField::ArtifactName => "artifact_name",
            ContextField::ArtifactContent => "artifact_content",
        }
    }

    pub fn is_artifact(&self) -> bool {
        matches!(
            self,
            ContextField::ArtifactName | ContextField::ArtifactContent
        )
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "objective" => Ok(ContextField::Objective),
            "scratchpad" => Ok(ContextField::Scratchpad),
            "artifact_name" | "artifactName" => Ok(ContextField::ArtifactName),
            "artifact_content" | "artifactContent" => Ok(ContextField::ArtifactContent),
            _ => Err(format!("Unknown context field: {}", s)),
        }
    }
}

/// A partial update to the shared context.
///
/// `None` means "leave the field alone"; `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratchpad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_content: Option<String>,
}

impl ContextPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(mut self, value: impl Into<String>) -> Self {
        self.objective = Some(value.into());
        self
    }

    pub fn scratchpad(mut self, value: impl Into<String>) -> Self {
        self.scratchpad = Some(value.into());
        self
    }

    pub fn artifact_name(mut self, value: impl Into<String>) -> Self {
        self.artifact_name = Some(value.into());
        self
    }

    pub fn artifact_content(mut self, value: impl Into<String>) -> Self {
        self.artifact_content = Some(value.into());
        self
    }

    /// Set a field by name.
    pub fn set(&mut self, field: ContextField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            ContextField::Objective => self.objective = value,
            ContextField::Scratchpad => self.scratchpad = value,
            ContextField::ArtifactName => self.artifact_name = value,
            ContextField::ArtifactContent => self.artifact_content = value,
        }
    }

    pub fn get(&self, field: ContextField) -> Option<&str> {
        match field {
            ContextField::Objective => self.objective.as_deref(),
            ContextField::Scratchpad => self.scratchpad.as_deref(),
            ContextField::ArtifactName => self.artifact_name.as_deref(),
            ContextField::ArtifactContent => self.artifact_content.as_deref(),
        }
    }

    /// Provided fields in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (ContextField, &str)> {
        ContextField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Names of the provided fields.
    pub fn fields(&self) -> Vec<ContextField> {
        self.entries().map(|(field, _)| field).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn touches_artifact(&self) -> bool {
        self.entries().any(|(field, _)| field.is_artifact())
    }

    /// Fold a later patch over this one; the later value wins per field.
    pub fn merge(mut self, later: ContextPatch) -> Self {
        for (field, value) in later.entries() {
            self.set(field, value);
        }
        self
    }
}

/// Size summary of the active artifact, returned by the read tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStats {
    pub name: String,
    pub bytes: usize,
    pub lines: usize,
}

impl ArtifactStats {
    pub fn of(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            bytes: content.len(),
            lines: content.lines().count(),
        }
    }
}

impl fmt::Display for ArtifactStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        };
        write!(f, "{}: {} bytes, {} lines", name, self.bytes, self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_entries_in_order() {
        let patch = ContextPatch::new()
            .artifact_content("body")
            .objective("goal");
        assert_eq!(
            patch.fields(),
            vec![ContextField::Objective, ContextField::ArtifactContent]
        );
        assert!(patch.touches_artifact());
    }

    #[test]
    fn test_patch_merge_later_wins() {
        let first = ContextPatch::new().objective("a").scratchpad("s");
        let second = ContextPatch::new().objective("b");
        let merged = first.merge(second);
        assert_eq!(merged.objective.as_deref(), Some("b"));
        assert_eq!(merged.scratchpad.as_deref(), Some("s"));
    }

    #[test]
    fn test_empty_patch() {
        assert!(ContextPatch::new().is_empty());
        assert!(!ContextPatch::new().scratchpad("").is_empty());
    }

    #[test]
    fn test_field_from_str_accepts_camel_case() {
        assert_eq!(
            "artifactContent".parse::<ContextField>().ok(),
            Some(ContextField::ArtifactContent)
        );
        assert!("title".parse::<ContextField>().is_err());
    }

    #[test]
    fn test_artifact_stats() {
        let stats = ArtifactStats::of("notes.md", "a\nb\nc");
        assert_eq!(stats.bytes, 5);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.to_string(), "notes.md: 5 bytes, 3 lines");
        assert_eq!(ArtifactStats::of("", "").lines, 0);
    }
}
