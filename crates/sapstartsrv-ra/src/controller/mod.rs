//! Lifecycle management for one SAP instance's `sapstartsrv`.
//!
//! The module is split into focused submodules:
//! - [`context`] holds the per-invocation state gathered by initialisation.
//! - [`error`] captures initialisation failures and their status mapping.
//! - [`lifecycle`] implements start/stop/status/monitor/validate.

mod context;
mod error;
mod lifecycle;

pub use context::ExecutionContext;
pub use error::LifecycleError;
pub use lifecycle::{Collaborators, LifecycleController};
