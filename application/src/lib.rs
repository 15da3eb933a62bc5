//! Application layer for synclab
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod gateway;
pub mod ports;
pub mod state;
pub mod use_cases;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{OrchestrationParams, SyncParams};
pub use gateway::{CompletionError, CompletionGateway};
pub use ports::{
    agent_completion::{
        AgentCompletion, ReconcileRequest, ReconcileResponse, TurnRequest, TurnResponse,
    },
    clock::{Clock, SystemClock},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    error_sink::{ErrorSink, NoErrorSink},
    persistence::{NoPersistence, PersistenceError, StatePersistence},
    progress::{NoRoundProgress, RoundProgressNotifier},
};
pub use state::{SharedRoster, SharedStateStore, SharedTranscript, StateRevision};
pub use use_cases::persistence_worker::PersistenceWorker;
pub use use_cases::reconcile::{
    ReconcileError, ReconcileOutcome, ReconcileTrigger, ReconcileUseCase,
};
pub use use_cases::run_round::{RoundError, RoundOutcome, RunRoundUseCase, TurnReport};
pub use use_cases::sync_coordinator::{SyncCoordinator, SyncEvent};
pub use workspace::{PostOutcome, Workspace, WorkspaceBuilder};
