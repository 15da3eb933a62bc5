//! Infrastructure layer for synclab
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, state and error-log
//! persistence, conversation logging and the completion provider.

pub mod config;
pub mod logging;
pub mod persistence;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, ConfigWarning, FileAgentEntry, FileConfig,
    FileProviderConfig, FileStorageConfig,
};
pub use logging::JsonlConversationLogger;
pub use persistence::{JsonFileStatePersistence, JsonlErrorSink};
#[cfg(feature = "openai")]
pub use providers::OpenAiCompatibleCompletion;
pub use tools::JsonSchemaToolConverter;
