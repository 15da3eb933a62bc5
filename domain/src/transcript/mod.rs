//! Transcript domain
//!
//! Append-only chat history shared by all agents within and across rounds.

pub mod entities;

pub use entities::{Author, EntryId, EntryKind, NewEntry, Transcript, TranscriptEntry};
