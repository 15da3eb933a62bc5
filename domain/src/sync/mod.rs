//! Synchronization trigger
//!
//! Watches artifact mutations and decides when an automatic reconciliation
//! pass should run.

pub mod trigger;

pub use trigger::{
    DEFAULT_DEBOUNCE, SyncDecision, SyncPhase, SyncTicket, SyncTrigger, TriggerConfig,
};
