//! Agent entities: descriptors and the roster that schedules them.

use super::value_objects::{AgentRole, AgentStatus, Priority, TargetSelector};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Configuration of one participating agent.
///
/// Role, display metadata and persona are fixed once loaded; `priority` and
/// `muted` are operator-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub role: AgentRole,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub muted: bool,
    /// System instruction that defines the agent's persona.
    pub persona: String,
}

impl AgentDescriptor {
    pub fn new(role: AgentRole, persona: impl Into<String>) -> Self {
        Self {
            display_name: role.label(),
            role,
            description: String::new(),
            priority: Priority::default(),
            muted: false,
            persona: persona.into(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn architect() -> Self {
        Self::new(
            AgentRole::Architect,
            "You are the Architect. You own the overall design: break the objective into \
             components, choose interfaces and trade-offs, and keep the scratchpad's plan \
             current. Prefer concise structural guidance over full implementations.",
        )
        .with_description("Designs structure and keeps the plan coherent")
        .with_priority(Priority::High)
    }

    pub fn engineer() -> Self {
        Self::new(
            AgentRole::Engineer,
            "You are the Engineer. You turn the agreed design into working content in the \
             active artifact. When you change the artifact, write the complete new content \
             with the update tool. Keep changes focused on the current objective.",
        )
        .with_description("Implements changes in the active artifact")
        .with_priority(Priority::Normal)
    }

    pub fn critic() -> Self {
        Self::new(
            AgentRole::Critic,
            "You are the Critic. Review what the other agents just said and changed. Point \
             out bugs, gaps and risks with specific references. Only edit shared state when \
             a correction is unambiguous.",
        )
        .with_description("Reviews recent output and flags problems")
        .with_priority(Priority::Low)
    }
}

/// Ordered set of agents plus their volatile runtime status.
///
/// Registration order is preserved and used as the tie-breaker when two
/// agents share a priority.
#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    agents: Vec<AgentDescriptor>,
    status: HashMap<AgentRole, AgentStatus>,
}

impl AgentRoster {
    /// Build a roster, rejecting duplicate roles and blank personas.
    pub fn new(agents: Vec<AgentDescriptor>) -> Result<Self, DomainError> {
        let mut roster = Self::default();
        for agent in agents {
            roster.register(agent)?;
        }
        Ok(roster)
    }

    /// Architect, Engineer and Critic with their default priorities.
    pub fn default_roster() -> Self {
        Self {
            agents: vec![
                AgentDescriptor::architect(),
                AgentDescriptor::engineer(),
                AgentDescriptor::critic(),
            ],
            status: HashMap::new(),
        }
    }

    pub fn register(&mut self, agent: AgentDescriptor) -> Result<(), DomainError> {
        if self.get(&agent.role).is_some() {
            return Err(DomainError::DuplicateAgent(agent.role.to_string()));
        }
        if agent.persona.trim().is_empty() {
            return Err(DomainError::InvalidAgent(format!(
                "{} has an empty persona",
                agent.role
            )));
        }
        self.agents.push(agent);
        Ok(())
    }

    pub fn get(&self, role: &AgentRole) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| &a.role == role)
    }

    fn get_mut(&mut self, role: &AgentRole) -> Result<&mut AgentDescriptor, DomainError> {
        self.agents
            .iter_mut()
            .find(|a| &a.role == role)
            .ok_or_else(|| DomainError::UnknownAgent(role.to_string()))
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn set_priority(&mut self, role: &AgentRole, priority: Priority) -> Result<(), DomainError> {
        self.get_mut(role)?.priority = priority;
        Ok(())
    }

    pub fn set_muted(&mut self, role: &AgentRole, muted: bool) -> Result<(), DomainError> {
        self.get_mut(role)?.muted = muted;
        Ok(())
    }

    pub fn status(&self, role: &AgentRole) -> AgentStatus {
        self.status.get(role).copied().unwrap_or_default()
    }

    pub fn set_status(&mut self, role: &AgentRole, status: AgentStatus) {
        self.status.insert(role.clone(), status);
    }

    /// Resolve a selector into the ordered list of agents to run.
    ///
    /// `AllUnmuted` drops muted agents and stably sorts the rest by priority,
    /// highest first, so equal priorities keep registration order. It fails
    /// with [`DomainError::NoAgents`] when every agent is muted.
    pub fn execution_queue(
        &self,
        selector: &TargetSelector,
    ) -> Result<Vec<AgentDescriptor>, DomainError> {
        match selector {
            TargetSelector::AllUnmuted => {
                let mut queue: Vec<AgentDescriptor> =
                    self.agents.iter().filter(|a| !a.muted).cloned().collect();
                if queue.is_empty() {
                    return Err(DomainError::NoAgents);
                }
                queue.sort_by_key(|a| Reverse(a.priority));
                Ok(queue)
            }
            TargetSelector::Single(role) => self
                .get(role)
                .cloned()
                .map(|agent| vec![agent])
                .ok_or_else(|| DomainError::UnknownAgent(role.to_string())),
        }
    }
}
