//! Failure taxonomy
//!
//! Provider failures are classified into a small closed set of kinds, each
//! with a fixed remediation hint. Nothing here retries; callers decide.

pub mod kind;
pub mod provider;
pub mod record;

pub use kind::ErrorKind;
pub use provider::{ProviderFailure, classify_message};
pub use record::ErrorRecord;
