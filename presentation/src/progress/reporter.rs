//! Progress reporting for rounds and reconciliation passes

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use synclab_application::{CompletionError, RoundProgressNotifier};
use synclab_domain::{AgentDescriptor, TranscriptEntry};

/// Reports progress with a spinner per running turn
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start(&self, prefix: String, message: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn finish(&self, line: String) {
        if let Ok(mut slot) = self.spinner.lock() {
            match slot.take() {
                Some(pb) => pb.finish_with_message(line),
                None => println!("{}", line),
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, agent: &AgentDescriptor) {
        self.start(agent.display_name.clone(), "thinking...");
    }

    fn on_turn_complete(&self, agent: &AgentDescriptor, entry: &TranscriptEntry) {
        let tools = entry.tool_invocations.len();
        let detail = if tools == 0 {
            "responded".to_string()
        } else {
            format!("responded, {} tool call(s)", tools)
        };
        self.finish(format!("{} {} {}", "✓".green(), agent.display_name.bold(), detail));
    }

    fn on_turn_failed(&self, agent: &AgentDescriptor, error: &CompletionError) {
        self.finish(format!(
            "{} {} {}",
            "✗".red(),
            agent.display_name.bold(),
            format!("[{}]", error.kind).red()
        ));
    }

    fn on_reconcile_start(&self, automatic: bool) {
        let prefix = if automatic { "Auto-sync" } else { "Sync" };
        self.start(prefix.to_string(), "re-deriving objective and scratchpad...");
    }

    fn on_reconcile_complete(&self, _entry: Option<&TranscriptEntry>) {
        self.finish(format!("{} {}", "✓".green(), "Shared state synchronized".bold()));
    }

    fn on_reconcile_failed(&self, error: &CompletionError) {
        self.finish(format!(
            "{} {} {}",
            "✗".red(),
            "Synchronization failed".bold(),
            format!("[{}]", error.kind).red()
        ));
    }
}

/// Plain line-based progress for `--quiet` and non-terminal output
pub struct SimpleProgress;

impl RoundProgressNotifier for SimpleProgress {
    fn on_round_start(&self, queue: &[AgentDescriptor]) {
        let names: Vec<&str> = queue.iter().map(|a| a.display_name.as_str()).collect();
        println!("{} {}", "->".cyan(), names.join(", "));
    }

    fn on_turn_complete(&self, agent: &AgentDescriptor, _entry: &TranscriptEntry) {
        println!("  {} {}", "✓".green(), agent.display_name);
    }

    fn on_turn_failed(&self, agent: &AgentDescriptor, error: &CompletionError) {
        println!("  {} {} ({})", "✗".red(), agent.display_name, error.kind);
    }

    fn on_reconcile_failed(&self, error: &CompletionError) {
        println!("  {} synchronization ({})", "✗".red(), error.kind);
    }
}
