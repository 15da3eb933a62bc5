//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for synclab
#[derive(Parser, Debug)]
#[command(name = "synclab")]
#[command(author, version, about = "Multi-agent workspace with change-triggered synchronization")]
#[command(long_about = r#"
synclab runs several LLM agents (by default an Architect, an Engineer and a
Critic) against one shared project state: an objective, a scratchpad and a
single working artifact.

Each message you type starts a round: every unmuted agent takes a turn in
priority order and may update the shared state through tools. A leading
@role sends the message to one agent only. When the artifact changes
significantly, the objective and scratchpad are re-derived automatically.

Configuration files are loaded from (in priority order):
1. SYNCLAB_* environment variables
2. --config <path>      Explicit config file
3. ./synclab.toml       Project-level config
4. ~/.config/synclab/config.toml   Global config

Example:
  synclab
  synclab --config team.toml -v
  synclab --load notes.md
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load a file as the active artifact before the session starts
    #[arg(long, value_name = "PATH")]
    pub load: Option<PathBuf>,

    /// Start from an empty shared state instead of the saved one
    #[arg(long)]
    pub fresh: bool,

    /// Suppress progress spinners
    #[arg(short, long)]
    pub quiet: bool,
}
