//! Operator console
//!
//! Reads edited lines from a `rustyline` prompt and drives the shared
//! [`Workspace`]. Transcript entries appended by rounds, manual syncs or the
//! background sync coordinator are printed in order after each command and
//! on a short interval while idle.

use crate::console::command::ConsoleCommand;
use crate::console::input::{InputEvent, LineInput, RustylineSource};
use crate::output::ConsoleFormatter;
use crate::progress::ProgressReporter;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use synclab_application::{ReconcileError, RoundError, RoundProgressNotifier, Workspace};
use synclab_domain::{Author, EntryId};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const REFRESH_INTERVAL: Duration = Duration::from_millis(500);
const PROMPT: &str = ">>> ";

/// Interactive operator console
pub struct Console {
    workspace: Arc<Workspace>,
    progress: Box<dyn RoundProgressNotifier>,
    /// Last transcript entry already shown
    cursor: Option<EntryId>,
}

impl Console {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            workspace,
            progress: Box::new(ProgressReporter::new()),
            cursor: None,
        }
    }

    /// Replace the spinner reporter, e.g. with [`SimpleProgress`](crate::SimpleProgress).
    pub fn with_progress(mut self, progress: Box<dyn RoundProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Run until `/quit`, end of input or cancellation.
    pub async fn run(&mut self, cancel: CancellationToken) -> std::io::Result<()> {
        // Entries restored from an earlier session are not replayed.
        self.cursor = self.workspace.transcript().await.last().map(|e| e.id);
        self.print_welcome().await;

        let history = RustylineSource::default_history_path();
        let mut input = LineInput::spawn(PROMPT, move || RustylineSource::open(history)).await?;
        let mut refresh = tokio::time::interval(REFRESH_INTERVAL);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    println!();
                    break;
                }
                event = input.next() => match event {
                    Some(InputEvent::Line(line)) => {
                        let keep_going = self.handle_line(&line).await;
                        print!("{}", self.take_new_entries().await);
                        if !keep_going {
                            println!("Bye!");
                            break;
                        }
                        input.ready();
                    }
                    Some(InputEvent::Failed(message)) => {
                        return Err(std::io::Error::other(message));
                    }
                    Some(InputEvent::Closed) | None => {
                        println!("Bye!");
                        break;
                    }
                },
                _ = refresh.tick() => {
                    let text = self.take_new_entries().await;
                    if !text.is_empty() {
                        input.print_above(text);
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    async fn handle_line(&mut self, line: &str) -> bool {
        let command = match ConsoleCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(message) => {
                println!("{}", message.yellow());
                return true;
            }
        };

        match command {
            ConsoleCommand::Message(text) => self.post(&text).await,
            ConsoleCommand::Sync => self.sync().await,
            ConsoleCommand::Mute(role) => {
                report(self.workspace.set_muted(&role, true).await, || {
                    format!("@{} muted", role.as_str())
                })
            }
            ConsoleCommand::Unmute(role) => {
                report(self.workspace.set_muted(&role, false).await, || {
                    format!("@{} unmuted", role.as_str())
                })
            }
            ConsoleCommand::Priority(role, priority) => {
                report(self.workspace.set_priority(&role, priority).await, || {
                    format!("@{} priority set to {}", role.as_str(), priority)
                })
            }
            ConsoleCommand::State => {
                print!("{}", ConsoleFormatter::state(&self.workspace.state()));
            }
            ConsoleCommand::Agents => {
                print!("{}", ConsoleFormatter::agents(&self.workspace.roster().await));
            }
            ConsoleCommand::Errors => {
                print!("{}", ConsoleFormatter::errors(&self.workspace.recent_errors()));
            }
            ConsoleCommand::Reset => {
                self.workspace.reset().await;
                println!("{}", "Shared state cleared.".green());
            }
            ConsoleCommand::Load(path) => self.load(&path).await,
            ConsoleCommand::Help => print!("{}", ConsoleFormatter::help()),
            ConsoleCommand::Quit => return false,
        }
        true
    }

    async fn post(&mut self, text: &str) {
        // Anything the background sync appended belongs above this round.
        print!("{}", self.take_new_entries().await);

        match self.workspace.post(text, self.progress.as_ref()).await {
            Ok(outcome) => {
                debug!(
                    completed = outcome.round.completed(),
                    failed = outcome.round.failed(),
                    "Round finished"
                );
            }
            Err(RoundError::UnknownAgent(role)) => {
                println!(
                    "{}",
                    format!("Unknown agent '@{}'. Type /agents to list them.", role).yellow()
                );
            }
            Err(RoundError::NoAgents) => {
                println!(
                    "{}",
                    "Every agent is muted. Use /unmute or address one with @role.".yellow()
                );
            }
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        }
    }

    async fn sync(&mut self) {
        match self.workspace.reconcile_now(self.progress.as_ref()).await {
            Ok(outcome) => {
                debug!(changed = outcome.changed.len(), "Manual sync finished");
            }
            Err(ReconcileError::Completion { error, .. }) => {
                println!("{}", error.hint().dimmed());
            }
        }
    }

    async fn load(&mut self, path: &Path) {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let changed = self.workspace.set_artifact(&name, &content);
                if changed.is_empty() {
                    println!("{}", format!("{} is already the active artifact.", name).dimmed());
                } else {
                    println!(
                        "{} {} ({} bytes)",
                        "Loaded".green(),
                        name.bold(),
                        content.len()
                    );
                }
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to load artifact: {}", e);
                println!("{} {}: {}", "Error:".red().bold(), path.display(), e);
            }
        }
    }

    /// Render transcript entries newer than the cursor and advance it.
    /// Operator entries advance the cursor without being echoed.
    async fn take_new_entries(&mut self) -> String {
        let entries = self.workspace.transcript().await;
        let cursor = self.cursor;
        let mut text = String::new();
        for entry in entries
            .iter()
            .filter(|e| cursor.is_none_or(|seen| e.id > seen))
        {
            if entry.author != Author::Operator {
                text.push_str(&ConsoleFormatter::entry(entry));
            }
            self.cursor = Some(entry.id);
        }
        text
    }

    async fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            synclab - shared workspace       │");
        println!("╰─────────────────────────────────────────────╯");

        print!("{}", ConsoleFormatter::agents(&self.workspace.roster().await));

        let stats = self.workspace.state().artifact_stats();
        if stats.bytes > 0 {
            println!("\n{} {}", "Artifact:".cyan().bold(), stats);
        }
        if !self.workspace.sync().is_enabled() {
            println!("{}", "Automatic synchronization is disabled.".dimmed());
        }

        let errors = self.workspace.recent_errors();
        if !errors.is_empty() {
            print!("{}", ConsoleFormatter::errors(&errors));
        }

        println!();
        println!("Type a message to start a round, @role to address one agent, /help for commands.");
        println!();
    }
}

fn report(result: Result<(), RoundError>, success: impl FnOnce() -> String) {
    match result {
        Ok(()) => println!("{}", success().green()),
        Err(e) => println!("{}", e.to_string().yellow()),
    }
}
