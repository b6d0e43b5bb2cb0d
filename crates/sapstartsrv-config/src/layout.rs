//! Derives the well-known host paths the resource agent touches.
//!
//! The agent never hardcodes a filesystem location outside this module: the
//! SAP installation tree, the systemd binary and unit directory, and the
//! temp directory holding `sapstartsrv` sockets are all resolved here so
//! tests can point the agent at a scratch directory.

use std::path::{Path, PathBuf};

use crate::Config;
use crate::defaults::{
    DEFAULT_SAP_ROOT, DEFAULT_SOCKET_DIR, DEFAULT_SYSTEMCTL_PATH, DEFAULT_UNIT_DIR,
    STALE_SOCKET_NAMES,
};

/// Canonical host paths consulted by the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLayout {
    sap_root: PathBuf,
    systemctl: PathBuf,
    unit_dir: PathBuf,
    socket_dir: PathBuf,
}

impl HostLayout {
    /// Builds a layout from explicit locations.
    #[must_use]
    pub fn new(
        sap_root: impl Into<PathBuf>,
        systemctl: impl Into<PathBuf>,
        unit_dir: impl Into<PathBuf>,
        socket_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sap_root: sap_root.into(),
            systemctl: systemctl.into(),
            unit_dir: unit_dir.into(),
            socket_dir: socket_dir.into(),
        }
    }

    /// Derives the layout from the loaded agent configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sap_root.as_std_path(),
            config.systemctl_path.as_std_path(),
            config.unit_dir.as_std_path(),
            config.socket_dir.as_std_path(),
        )
    }

    /// Root of the SAP installation tree.
    pub fn sap_root(&self) -> &Path {
        self.sap_root.as_path()
    }

    /// Path to the systemd control binary.
    pub fn systemctl(&self) -> &Path {
        self.systemctl.as_path()
    }

    /// Directory holding administrator-installed unit files.
    pub fn unit_dir(&self) -> &Path {
        self.unit_dir.as_path()
    }

    /// Directory holding the `sapstartsrv` interprocess sockets.
    pub fn socket_dir(&self) -> &Path {
        self.socket_dir.as_path()
    }

    /// `<sap-root>/<SID>/<INSTANCE>`.
    #[must_use]
    pub fn instance_dir(&self, sid: &str, instance: &str) -> PathBuf {
        self.sap_root.join(sid).join(instance)
    }

    /// `<sap-root>/<SID>/SYS/profile`.
    #[must_use]
    pub fn profile_dir(&self, sid: &str) -> PathBuf {
        self.sap_root.join(sid).join("SYS").join("profile")
    }

    /// Location a unit file would have when installed through the standard path.
    #[must_use]
    pub fn unit_path(&self, unit: &str) -> PathBuf {
        self.unit_dir.join(unit)
    }

    /// Sockets a crashed `sapstartsrv` may leave behind.
    #[must_use]
    pub fn stale_sockets(&self) -> [PathBuf; 2] {
        STALE_SOCKET_NAMES.map(|name| self.socket_dir.join(name))
    }
}

impl Default for HostLayout {
    fn default() -> Self {
        Self::new(
            DEFAULT_SAP_ROOT,
            DEFAULT_SYSTEMCTL_PATH,
            DEFAULT_UNIT_DIR,
            DEFAULT_SOCKET_DIR,
        )
    }
}
