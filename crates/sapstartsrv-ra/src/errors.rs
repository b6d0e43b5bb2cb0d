//! Error types for the agent binary runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::ocf::OcfStatus;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("unsupported action '{0}'")]
    UnknownAction(String),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to write meta-data: {0}")]
    WriteMetadata(io::Error),
}

impl AppError {
    /// Status reported to the cluster manager for this failure.
    pub(crate) const fn status(&self) -> OcfStatus {
        match self {
            Self::CliUsage(_) => OcfStatus::ErrArgs,
            Self::UnknownAction(_) => OcfStatus::ErrUnimplemented,
            Self::LoadConfiguration(_) | Self::Telemetry(_) | Self::WriteMetadata(_) => {
                OcfStatus::ErrGeneric
            }
        }
    }
}
