//! Agent domain
//!
//! Agent descriptors, their scheduling priority and the roster that turns a
//! [`TargetSelector`] into an ordered execution queue.

pub mod entities;
pub mod value_objects;

pub use entities::{AgentDescriptor, AgentRoster};
pub use value_objects::{AgentRole, AgentStatus, Priority, TargetSelector};
