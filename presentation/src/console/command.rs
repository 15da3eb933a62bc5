//! Operator console command parsing

use std::path::PathBuf;
use synclab_domain::{AgentRole, Priority};

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Plain text, optionally starting with `@role`
    Message(String),
    /// Run a manual reconciliation pass
    Sync,
    Mute(AgentRole),
    Unmute(AgentRole),
    Priority(AgentRole, Priority),
    State,
    Agents,
    Errors,
    Reset,
    /// Replace the active artifact with a file's content
    Load(PathBuf),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(ConsoleCommand::Message(line.to_string())));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("sync", []) => ConsoleCommand::Sync,
            ("mute", [role]) => ConsoleCommand::Mute(parse_role(role)?),
            ("unmute", [role]) => ConsoleCommand::Unmute(parse_role(role)?),
            ("priority", [role, priority]) => ConsoleCommand::Priority(
                parse_role(role)?,
                priority
                    .parse()
                    .map_err(|_| format!("Unknown priority '{}'. Use high, normal or low.", priority))?,
            ),
            ("state", []) => ConsoleCommand::State,
            ("agents", []) => ConsoleCommand::Agents,
            ("errors", []) => ConsoleCommand::Errors,
            ("reset", []) => ConsoleCommand::Reset,
            ("load", [_, ..]) => {
                // Paths may contain spaces; take everything after the command.
                let path = rest
                    .trim_start()
                    .split_once(char::is_whitespace)
                    .map(|(_, path)| path.trim())
                    .unwrap_or_default();
                ConsoleCommand::Load(PathBuf::from(path))
            }
            ("help" | "h" | "?", []) => ConsoleCommand::Help,
            ("quit" | "exit" | "q", []) => ConsoleCommand::Quit,
            ("mute" | "unmute", _) => return Err(format!("Usage: /{} <role>", name)),
            ("priority", _) => return Err("Usage: /priority <role> <high|normal|low>".to_string()),
            ("load", _) => return Err("Usage: /load <path>".to_string()),
            (
                "sync" | "state" | "agents" | "errors" | "reset" | "help" | "h" | "?" | "quit"
                | "exit" | "q",
                _,
            ) => return Err(format!("/{} takes no arguments", name)),
            _ => {
                return Err(format!(
                    "Unknown command: /{}. Type /help for available commands.",
                    name
                ));
            }
        };
        Ok(Some(command))
    }
}

fn parse_role(raw: &str) -> Result<AgentRole, String> {
    raw.trim_start_matches('@').parse()
}
