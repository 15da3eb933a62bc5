//! Prompt templates for agent turns and reconciliation passes

use crate::agent::AgentDescriptor;
use crate::context::ContextState;
use crate::tool::ToolSpec;
use crate::transcript::{EntryKind, TranscriptEntry};
use crate::util::clip_with_marker;

/// Artifact content above this size is clipped in prompts.
pub const MAX_ARTIFACT_PROMPT_BYTES: usize = 48 * 1024;

/// Templates for generating prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for one agent turn: persona, shared state, tools.
    pub fn agent_system(
        agent: &AgentDescriptor,
        state: &ContextState,
        tool_spec: &ToolSpec,
    ) -> String {
        let tools = tool_spec
            .all()
            .map(|t| {
                let params = if t.parameters.is_empty() {
                    "  (no arguments)".to_string()
                } else {
                    t.parameters
                        .iter()
                        .map(|p| format!("  - {}: {}", p.name, p.description))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                format!("- {} [{}]: {}\n{}", t.name, t.access.as_str(), t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"{persona}

You are {name}, one of several agents collaborating with a human operator on a
single shared project. Other agents speak before or after you in the same round
and can see what you write and change.

## Shared project state

{state}

## Tools

{tools}

Call a tool when the shared state should change. Do not restate the whole
artifact in your message when you are also writing it through a tool. Keep
your message short and address the others by role when useful."#,
            persona = agent.persona.trim(),
            name = agent.display_name,
            state = Self::render_state(state),
            tools = tools,
        )
    }

    /// User prompt that hands the floor to an agent.
    pub fn turn_prompt(agent: &AgentDescriptor, transcript: &[TranscriptEntry]) -> String {
        format!(
            "Conversation so far:\n\n{}\n\nIt is your turn, {}. Respond to the latest messages.",
            Self::render_transcript(transcript),
            agent.display_name
        )
    }

    /// System prompt for the reconciliation pass.
    pub fn reconcile_system() -> &'static str {
        r#"You maintain the shared objective and scratchpad of a collaborative project.
You are not a participant in the conversation. Read the conversation and the
current artifact, then rewrite the objective and scratchpad so they reflect
what the team has actually decided and done.

Respond with a single JSON object and nothing else:
{"objective": "...", "scratchpad": "...", "rationale": "..."}

- objective: one or two sentences stating the current goal
- scratchpad: concise working notes, open questions and next steps
- rationale: one sentence on what you changed and why

Return a field unchanged if it is already accurate."#
    }

    /// User prompt for the reconciliation pass.
    pub fn reconcile_prompt(transcript: &[TranscriptEntry], state: &ContextState) -> String {
        format!(
            "## Current state\n\n{}\n\n## Recent conversation\n\n{}",
            Self::render_state(state),
            Self::render_transcript(transcript)
        )
    }

    pub fn render_state(state: &ContextState) -> String {
        let or_blank = |s: &str| {
            if s.trim().is_empty() {
                "(empty)".to_string()
            } else {
                s.to_string()
            }
        };
        let stats = state.artifact_stats();

        format!(
            "Objective:\n{}\n\nScratchpad:\n{}\n\nArtifact ({}):\n```\n{}\n```",
            or_blank(&state.objective),
            or_blank(&state.scratchpad),
            stats,
            clip_with_marker(&state.artifact_content, MAX_ARTIFACT_PROMPT_BYTES)
        )
    }

    /// One block per entry, oldest first. Tool outcomes are listed under
    /// the message that produced them.
    pub fn render_transcript(entries: &[TranscriptEntry]) -> String {
        if entries.is_empty() {
            return "(no messages yet)".to_string();
        }

        entries
            .iter()
            .map(|entry| {
                let label = match entry.kind {
                    EntryKind::Message => entry.author.to_string(),
                    EntryKind::Failure => format!("{} (failure)", entry.author),
                    EntryKind::Synthesis => format!("{} (synthesis)", entry.author),
                };
                let mut block = format!("[{}]: {}", label, entry.content);
                for invocation in &entry.tool_invocations {
                    block.push_str(&format!(
                        "\n  -> {} {}: {}",
                        invocation.tool_name,
                        invocation.status.as_str(),
                        invocation.outcome
                    ));
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRole;
    use crate::tool::{ToolCall, ToolInvocation, workspace_tool_spec};
    use crate::transcript::{Author, NewEntry, Transcript};

    fn state() -> ContextState {
        ContextState::default()
            .with_objective("Ship the parser")
            .with_artifact("parser.rs", "fn parse() {}\n")
    }

    #[test]
    fn test_agent_system_includes_persona_state_and_tools() {
        let agent = AgentDescriptor::architect();
        let prompt = PromptTemplate::agent_system(&agent, &state(), &workspace_tool_spec());
        assert!(prompt.starts_with(agent.persona.trim()));
        assert!(prompt.contains("Ship the parser"));
        assert!(prompt.contains("parser.rs: 14 bytes, 1 lines"));
        assert!(prompt.contains("update_context"));
        assert!(prompt.contains("inspect_artifact"));
        assert!(prompt.contains("(no arguments)"));
    }

    #[test]
    fn test_blank_fields_render_as_empty() {
        let rendered = PromptTemplate::render_state(&ContextState::default());
        assert!(rendered.contains("Objective:\n(empty)"));
        assert!(rendered.contains("Scratchpad:\n(empty)"));
    }

    #[test]
    fn test_large_artifact_is_clipped() {
        let content = "x".repeat(MAX_ARTIFACT_PROMPT_BYTES + 10);
        let state = ContextState::default().with_artifact("big.txt", content);
        let rendered = PromptTemplate::render_state(&state);
        assert!(rendered.contains("[... 10 more bytes omitted]"));
    }

    #[test]
    fn test_render_transcript_lists_tool_outcomes() {
        let mut transcript = Transcript::new();
        transcript.append(NewEntry::message(Author::Operator, "Plan the parser"));

        let call = ToolCall::new("inspect_artifact");
        let mut invocation = ToolInvocation::pending(&call);
        invocation.succeed("parser.rs: 14 bytes, 1 lines");
        transcript.append(
            NewEntry::message(Author::Agent(AgentRole::Engineer), "Looked at it")
                .with_tool_invocations(vec![invocation]),
        );
        transcript.append(NewEntry::failure("Critic failed: [RATE_LIMIT]"));

        let rendered = PromptTemplate::render_transcript(transcript.entries());
        assert!(rendered.contains("[Operator]: Plan the parser"));
        assert!(rendered.contains("[Engineer]: Looked at it"));
        assert!(rendered.contains("-> inspect_artifact success: parser.rs: 14 bytes, 1 lines"));
        assert!(rendered.contains("[System (failure)]: Critic failed"));
    }

    #[test]
    fn test_reconcile_prompt() {
        let prompt = PromptTemplate::reconcile_prompt(&[], &state());
        assert!(prompt.contains("(no messages yet)"));
        assert!(prompt.contains("Ship the parser"));
        assert!(PromptTemplate::reconcile_system().contains("\"rationale\""));
    }

    #[test]
    fn test_turn_prompt_names_agent() {
        let agent = AgentDescriptor::critic();
        let prompt = PromptTemplate::turn_prompt(&agent, &[]);
        assert!(prompt.contains(&format!("It is your turn, {}", agent.display_name)));
    }
}
