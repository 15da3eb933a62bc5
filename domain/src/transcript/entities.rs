//! Transcript entities
//!
//! The transcript is the shared conversational memory handed to every agent
//! turn. It is append-only: entries are created complete and never edited.

use crate::agent::AgentRole;
use crate::tool::ToolInvocation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic identifier of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who wrote an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum Author {
    /// The human operator.
    Operator,
    /// An agent, by role.
    Agent(AgentRole),
    /// The orchestrator itself (failures, synthesis summaries).
    System,
}

impl Author {
    pub fn is_agent(&self, role: &AgentRole) -> bool {
        matches!(self, Author::Agent(r) if r == role)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Operator => write!(f, "Operator"),
            Author::Agent(role) => write!(f, "{}", role),
            Author::System => write!(f, "System"),
        }
    }
}

/// What an entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Ordinary chat message from the operator or an agent.
    #[default]
    Message,
    /// A contained failure (agent turn or reconciliation).
    Failure,
    /// Summary of a reconciliation pass.
    Synthesis,
}

/// Everything needed to append an entry; id and timestamp are assigned by
/// the [`Transcript`].
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub author: Author,
    pub kind: EntryKind,
    pub content: String,
    pub tool_invocations: Vec<ToolInvocation>,
}

impl NewEntry {
    pub fn message(author: Author, content: impl Into<String>) -> Self {
        Self {
            author,
            kind: EntryKind::Message,
            content: content.into(),
            tool_invocations: Vec::new(),
        }
    }

    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            author: Author::System,
            kind: EntryKind::Failure,
            content: content.into(),
            tool_invocations: Vec::new(),
        }
    }

    pub fn synthesis(content: impl Into<String>) -> Self {
        Self {
            author: Author::System,
            kind: EntryKind::Synthesis,
            content: content.into(),
            tool_invocations: Vec::new(),
        }
    }

    pub fn with_tool_invocations(mut self, invocations: Vec<ToolInvocation>) -> Self {
        self.tool_invocations = invocations;
        self
    }
}

/// A single, immutable transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub author: Author,
    #[serde(default)]
    pub kind: EntryKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
}

impl TranscriptEntry {
    pub fn is_failure(&self) -> bool {
        self.kind == EntryKind::Failure
    }
}

/// Append-only ordered sequence of entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning the next id and the current time.
    pub fn append(&mut self, entry: NewEntry) -> &TranscriptEntry {
        self.next_id += 1;
        self.entries.push(TranscriptEntry {
            id: EntryId(self.next_id),
            author: entry.author,
            kind: entry.kind,
            content: entry.content,
            created_at: Utc::now(),
            tool_invocations: entry.tool_invocations,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// The most recent `window` entries, oldest first.
    pub fn recent(&self, window: usize) -> &[TranscriptEntry] {
        let start = self.entries.len().saturating_sub(window);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
