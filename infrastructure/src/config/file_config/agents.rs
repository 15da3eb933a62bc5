//! Agent roster configuration (`[[agents]]` array)

use super::{ConfigValidationError, ConfigWarning};
use serde::{Deserialize, Serialize};
use synclab_domain::{AgentDescriptor, AgentRole, Priority};

/// One `[[agents]]` entry
///
/// # Example
///
/// ```toml
/// [[agents]]
/// role = "critic"
/// priority = "high"
///
/// [[agents]]
/// role = "tester"
/// display_name = "QA"
/// persona = "You write failing tests for every claim the others make."
/// ```
///
/// Built-in roles (`architect`, `engineer`, `critic`) inherit their default
/// persona and priority; custom roles must provide a persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentEntry {
    pub role: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// "high", "normal" or "low"
    pub priority: Option<String>,
    pub muted: bool,
    pub persona: Option<String>,
}

impl FileAgentEntry {
    pub fn parse_role(&self) -> Result<AgentRole, ConfigValidationError> {
        self.role
            .parse::<AgentRole>()
            .map_err(|reason| ConfigValidationError::InvalidRole {
                role: self.role.clone(),
                reason,
            })
    }

    /// Parse the priority string, falling back with a warning when unknown.
    pub fn parse_priority(&self, fallback: Priority) -> (Priority, Vec<ConfigWarning>) {
        let Some(raw) = &self.priority else {
            return (fallback, vec![]);
        };
        match raw.parse::<Priority>() {
            Ok(priority) => (priority, vec![]),
            Err(_) => (
                Priority::Normal,
                vec![ConfigWarning::new(
                    format!("agents.{}.priority", self.role.trim()),
                    format!(
                        "unknown priority '{}', expected high, normal or low; using normal",
                        raw
                    ),
                )],
            ),
        }
    }

    pub fn to_descriptor(&self) -> Result<(AgentDescriptor, Vec<ConfigWarning>), ConfigValidationError> {
        let role = self.parse_role()?;
        let base = match role {
            AgentRole::Architect => Some(AgentDescriptor::architect()),
            AgentRole::Engineer => Some(AgentDescriptor::engineer()),
            AgentRole::Critic => Some(AgentDescriptor::critic()),
            AgentRole::Custom(_) => None,
        };

        let persona = match self.persona.as_deref().map(str::trim) {
            Some(persona) if !persona.is_empty() => persona.to_string(),
            _ => match &base {
                Some(base) => base.persona.clone(),
                None => return Err(ConfigValidationError::EmptyPersona(role.to_string())),
            },
        };

        let fallback = base.as_ref().map(|b| b.priority).unwrap_or_default();
        let (priority, warnings) = self.parse_priority(fallback);

        let mut descriptor = match base {
            Some(mut base) => {
                base.persona = persona;
                base
            }
            None => AgentDescriptor::new(role, persona),
        };
        descriptor = descriptor.with_priority(priority).muted(self.muted);
        if let Some(name) = self.display_name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            descriptor = descriptor.with_display_name(name);
        }
        if let Some(description) = &self.description {
            descriptor = descriptor.with_description(description.trim());
        }

        Ok((descriptor, warnings))
    }
}
