//! Agent value objects: roles, priorities, runtime status and round targets.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The role an agent plays in the workspace.
///
/// The three built-in roles cover the usual design/build/review loop;
/// `Custom` lets a configuration add more without code changes. Custom role
/// names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AgentRole {
    Architect,
    Engineer,
    Critic,
    Custom(String),
}

impl AgentRole {
    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Architect => "architect",
            AgentRole::Engineer => "engineer",
            AgentRole::Critic => "critic",
            AgentRole::Custom(name) => name,
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, AgentRole::Custom(_))
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "" => Err("Agent role cannot be empty".to_string()),
            "architect" => Ok(AgentRole::Architect),
            "engineer" => Ok(AgentRole::Engineer),
            "critic" => Ok(AgentRole::Critic),
            other if other.chars().any(char::is_whitespace) => {
                Err(format!("Agent role cannot contain whitespace: {}", s))
            }
            other => Ok(AgentRole::Custom(other.to_string())),
        }
    }
}

impl From<AgentRole> for String {
    fn from(role: AgentRole) -> Self {
        role.as_str().to_string()
    }
}

impl TryFrom<String> for AgentRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Scheduling priority of an agent within a round.
///
/// Ordered so that `High > Normal > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Numeric rank, higher runs earlier.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 2,
            Priority::Normal => 1,
            Priority::Low => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "normal" | "n" | "medium" => Ok(Priority::Normal),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(format!("Invalid Priority: {}", s)),
        }
    }
}

/// Volatile runtime status of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Thinking,
    Failed,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Idle => write!(f, "idle"),
            AgentStatus::Thinking => write!(f, "thinking"),
            AgentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Which agents a round should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Every unmuted agent, highest priority first.
    AllUnmuted,
    /// Exactly one agent, addressed by role. Runs even when muted.
    Single(AgentRole),
}

impl TargetSelector {
    /// Parse an operator message for a leading `@role` mention.
    ///
    /// Returns the selector plus the message with the mention stripped.
    /// A message without a leading mention targets all unmuted agents.
    pub fn from_message(message: &str) -> (Self, &str) {
        let trimmed = message.trim_start();
        if let Some(rest) = trimmed.strip_prefix('@') {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            if let Ok(role) = rest[..end].parse::<AgentRole>() {
                return (TargetSelector::Single(role), rest[end..].trim_start());
            }
        }
        (TargetSelector::AllUnmuted, message)
    }
}
