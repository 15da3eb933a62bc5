//! State persistence port
//!
//! Load at startup, save after changes. Callers treat saving as best-effort.

use async_trait::async_trait;
use synclab_domain::ContextState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait StatePersistence: Send + Sync {
    /// Previously saved state, or `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<ContextState>, PersistenceError>;

    async fn save(&self, state: &ContextState) -> Result<(), PersistenceError>;
}

/// Persistence that keeps nothing.
pub struct NoPersistence;

#[async_trait]
impl StatePersistence for NoPersistence {
    async fn load(&self) -> Result<Option<ContextState>, PersistenceError> {
        Ok(None)
    }

    async fn save(&self, _state: &ContextState) -> Result<(), PersistenceError> {
        Ok(())
    }
}
