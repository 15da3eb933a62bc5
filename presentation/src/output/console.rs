//! Console output formatter for the shared workspace

use colored::Colorize;
use synclab_domain::util::{clip_with_marker, one_line_preview};
use synclab_domain::{
    AgentDescriptor, AgentStatus, Author, ContextState, EntryKind, ErrorRecord, InvocationStatus,
    TranscriptEntry,
};

/// Artifact bytes shown by `/state`
const ARTIFACT_PREVIEW_BYTES: usize = 2000;
const OUTCOME_PREVIEW_CHARS: usize = 120;

/// Formats workspace data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One transcript entry with its tool invocations.
    pub fn entry(entry: &TranscriptEntry) -> String {
        let header = match (&entry.author, entry.kind) {
            (_, EntryKind::Failure) => format!("── {} ──", "Failure").red().bold(),
            (_, EntryKind::Synthesis) => format!("── {} ──", "Synchronized").magenta().bold(),
            (Author::Operator, _) => "── You ──".cyan().bold(),
            (Author::Agent(role), _) => format!("── {} ──", role).yellow().bold(),
            (Author::System, _) => "── System ──".dimmed(),
        };

        let mut output = format!("\n{}\n", header);
        if !entry.content.trim().is_empty() {
            output.push_str(entry.content.trim_end());
            output.push('\n');
        }

        for invocation in &entry.tool_invocations {
            let status = match invocation.status {
                InvocationStatus::Success => "ok".green(),
                InvocationStatus::Failure => "failed".red(),
                InvocationStatus::Pending => "pending".dimmed(),
            };
            output.push_str(&format!(
                "  {} {} {}: {}\n",
                "->".dimmed(),
                invocation.tool_name.bold(),
                status,
                one_line_preview(&invocation.outcome, OUTCOME_PREVIEW_CHARS)
            ));
        }
        output
    }

    pub fn state(state: &ContextState) -> String {
        let or_blank = |s: &str| {
            if s.trim().is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                s.trim_end().to_string()
            }
        };

        let mut output = String::new();
        output.push_str(&Self::section_header("Shared State"));
        output.push_str(&format!(
            "\n{}\n{}\n",
            "Objective:".cyan().bold(),
            or_blank(&state.objective)
        ));
        output.push_str(&format!(
            "\n{}\n{}\n",
            "Scratchpad:".cyan().bold(),
            or_blank(&state.scratchpad)
        ));

        let stats = state.artifact_stats();
        let name = if stats.name.is_empty() {
            "(unnamed)"
        } else {
            stats.name.as_str()
        };
        output.push_str(&format!(
            "\n{} {} ({} bytes, {} lines)\n",
            "Artifact:".cyan().bold(),
            name,
            stats.bytes,
            stats.lines
        ));
        if !state.artifact_content.is_empty() {
            output.push_str(&clip_with_marker(
                &state.artifact_content,
                ARTIFACT_PREVIEW_BYTES,
            ));
            output.push('\n');
        }
        output
    }

    pub fn agents(agents: &[(AgentDescriptor, AgentStatus)]) -> String {
        let mut output = Self::section_header("Agents");
        for (agent, status) in agents {
            let status = match status {
                AgentStatus::Idle => status.to_string().dimmed(),
                AgentStatus::Thinking => status.to_string().yellow(),
                AgentStatus::Failed => status.to_string().red(),
            };
            let muted = if agent.muted {
                format!(" {}", "muted".red())
            } else {
                String::new()
            };
            output.push_str(&format!(
                "  {:<12} @{:<12} {:<7} {}{}\n",
                agent.display_name.bold(),
                agent.role.as_str(),
                agent.priority.as_str(),
                status,
                muted
            ));
        }
        output
    }

    pub fn errors(records: &[ErrorRecord]) -> String {
        if records.is_empty() {
            return format!("{}\n", "No recorded errors.".dimmed());
        }
        let mut output = Self::section_header("Recent Errors");
        for record in records {
            output.push_str(&format!(
                "  {} {} {}: {}\n",
                record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                format!("[{}]", record.kind).red().bold(),
                record.context,
                record.message
            ));
            if let Some(hint) = &record.hint {
                output.push_str(&format!("      {}\n", hint.dimmed()));
            }
        }
        output
    }

    pub fn help() -> String {
        let mut output = Self::section_header("Commands");
        for (command, description) in [
            ("<text>", "Post a message; every unmuted agent takes a turn"),
            ("@role <text>", "Post a message to one agent (runs even when muted)"),
            ("/sync", "Re-derive objective and scratchpad now"),
            ("/state", "Show the shared state"),
            ("/agents", "Show agents, priorities and status"),
            ("/mute <role>", "Skip an agent in broadcast rounds"),
            ("/unmute <role>", "Include an agent again"),
            ("/priority <role> <level>", "Set high, normal or low"),
            ("/load <path>", "Replace the artifact with a file's content"),
            ("/errors", "Show recent failures"),
            ("/reset", "Clear the shared state (the conversation is kept)"),
            ("/help", "Show this help"),
            ("/quit", "Exit"),
        ] {
            output.push_str(&format!("  {:<26} {}\n", command.cyan(), description));
        }
        output
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.bold(), "─".repeat(40).dimmed())
    }
}
