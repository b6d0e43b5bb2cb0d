//! Shared configuration for the `SAPStartSrv` resource agent.
//!
//! Agent-level settings are layered by [`ortho_config`]: built-in defaults,
//! then a configuration file, then `SAPSTARTSRV_*` environment variables, then
//! command-line flags. Resource parameters handed over by the cluster manager
//! (`OCF_RESKEY_*`) are not part of this crate; they belong to the agent
//! runtime and vary per resource.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod layout;
mod logging;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SAP_ROOT, DEFAULT_SOCKET_DIR, DEFAULT_SYSTEMCTL_PATH,
    DEFAULT_UNIT_DIR, STALE_SOCKET_NAMES, default_log_filter, default_log_filter_string,
    default_log_format, default_sap_root, default_socket_dir, default_systemctl_path,
    default_unit_dir,
};
pub use layout::HostLayout;
pub use logging::LogFormat;

/// Agent settings shared by the binary and its tests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SAPSTARTSRV")]
pub struct Config {
    /// `tracing` filter expression applied to agent logs.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for agent logs.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Root of the SAP installation tree.
    #[ortho_config(default = default_sap_root())]
    pub sap_root: Utf8PathBuf,
    /// Path to the systemd control binary.
    #[ortho_config(default = default_systemctl_path())]
    pub systemctl_path: Utf8PathBuf,
    /// Directory holding administrator-installed unit files.
    #[ortho_config(default = default_unit_dir())]
    pub unit_dir: Utf8PathBuf,
    /// Directory where `sapstartsrv` leaves its interprocess sockets.
    #[ortho_config(default = default_socket_dir())]
    pub socket_dir: Utf8PathBuf,
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Resolves the host paths described by this configuration.
    #[must_use]
    pub fn host_layout(&self) -> HostLayout {
        HostLayout::from_config(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            sap_root: default_sap_root(),
            systemctl_path: default_systemctl_path(),
            unit_dir: default_unit_dir(),
            socket_dir: default_socket_dir(),
        }
    }
}
