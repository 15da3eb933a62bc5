//! Use cases
//!
//! - [`run_round`] - sequential, priority-ordered agent turns
//! - [`reconcile`] - objective/scratchpad synthesis
//! - [`sync_coordinator`] - debounced automatic reconciliation
//! - [`persistence_worker`] - debounced state saving

pub mod persistence_worker;
pub mod reconcile;
pub mod run_round;
pub mod sync_coordinator;
