//! Interactive operator console

pub mod command;
pub mod input;
pub mod repl;

pub use command::ConsoleCommand;
pub use input::{InputEvent, LineInput, LineSource, RustylineSource};
pub use repl::Console;
