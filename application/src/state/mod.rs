//! Shared session state: the context store, the transcript and the roster.

pub mod roster;
pub mod store;
pub mod transcript;

pub use roster::SharedRoster;
pub use store::{SharedStateStore, StateRevision};
pub use transcript::SharedTranscript;
