//! Presentation layer for synclab
//!
//! This crate contains CLI definitions, the interactive operator console,
//! output formatters, and progress reporters.

pub mod cli;
pub mod console;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use console::{Console, ConsoleCommand};
pub use output::ConsoleFormatter;
pub use progress::{ProgressReporter, SimpleProgress};
