//! Error types for instance lifecycle operations.

use thiserror::Error;

use crate::locator::LocatorError;
use crate::naming::NamingError;
use crate::ocf::OcfStatus;

/// Failures that stop an operation before it touches the instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The instance identifier is malformed.
    #[error(transparent)]
    Naming(#[from] NamingError),
    /// The instance executables could not be found.
    #[error(transparent)]
    Locator(#[from] LocatorError),
}

impl LifecycleError {
    /// Status reported to the cluster manager.
    ///
    /// Both kinds describe the resource configuration, so neither is
    /// retryable.
    #[must_use]
    pub const fn status(&self) -> OcfStatus {
        match self {
            Self::Naming(_) | Self::Locator(_) => OcfStatus::ErrArgs,
        }
    }
}
