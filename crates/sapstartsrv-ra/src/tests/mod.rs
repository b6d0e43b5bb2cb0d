//! Unit and behavioural tests for the agent runtime.

mod behaviour;
pub(crate) mod support;
