//! Agent roster shared between the orchestrator and operator controls.

use std::sync::Arc;
use synclab_domain::{
    AgentDescriptor, AgentRole, AgentRoster, AgentStatus, DomainError, Priority, TargetSelector,
};
use tokio::sync::RwLock;

/// Cloneable handle to the roster. Priority, mute and runtime status are
/// the only things that change after startup.
#[derive(Debug, Clone)]
pub struct SharedRoster {
    inner: Arc<RwLock<AgentRoster>>,
}

impl SharedRoster {
    pub fn new(roster: AgentRoster) -> Self {
        Self {
            inner: Arc::new(RwLock::new(roster)),
        }
    }

    pub async fn execution_queue(
        &self,
        selector: &TargetSelector,
    ) -> Result<Vec<AgentDescriptor>, DomainError> {
        self.inner.read().await.execution_queue(selector)
    }

    pub async fn set_priority(&self, role: &AgentRole, priority: Priority) -> Result<(), DomainError> {
        self.inner.write().await.set_priority(role, priority)
    }

    pub async fn set_muted(&self, role: &AgentRole, muted: bool) -> Result<(), DomainError> {
        self.inner.write().await.set_muted(role, muted)
    }

    pub async fn set_status(&self, role: &AgentRole, status: AgentStatus) {
        self.inner.write().await.set_status(role, status);
    }

    pub async fn status(&self, role: &AgentRole) -> AgentStatus {
        self.inner.read().await.status(role)
    }

    /// Agents in registration order with their current status.
    pub async fn snapshot(&self) -> Vec<(AgentDescriptor, AgentStatus)> {
        let roster = self.inner.read().await;
        roster
            .agents()
            .iter()
            .map(|agent| (agent.clone(), roster.status(&agent.role)))
            .collect()
    }
}

impl Default for SharedRoster {
    fn default() -> Self {
        Self::new(AgentRoster::default_roster())
    }
}
