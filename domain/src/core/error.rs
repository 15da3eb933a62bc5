//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent already registered: {0}")]
    DuplicateAgent(String),

    #[error("Invalid agent: {0}")]
    InvalidAgent(String),

    #[error("No agents to run")]
    NoAgents,
}

impl DomainError {
    /// Check if this error refers to an agent that is not in the roster
    pub fn is_unknown_agent(&self) -> bool {
        matches!(self, DomainError::UnknownAgent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_display() {
        let error = DomainError::UnknownAgent("Ghost".to_string());
        assert_eq!(error.to_string(), "Unknown agent: Ghost");
    }

    #[test]
    fn test_is_unknown_agent_check() {
        assert!(DomainError::UnknownAgent("x".to_string()).is_unknown_agent());
        assert!(!DomainError::NoAgents.is_unknown_agent());
        assert!(!DomainError::DuplicateAgent("x".to_string()).is_unknown_agent());
    }
}
