//! Durable storage adapters: the shared state file and the error log.

mod error_log;
mod state_file;

pub use error_log::JsonlErrorSink;
pub use state_file::JsonFileStatePersistence;
