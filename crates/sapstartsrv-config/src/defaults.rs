use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression used by the agent binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Root of the SAP installation tree holding `<SID>/<INSTANCE>/exe`.
pub const DEFAULT_SAP_ROOT: &str = "/usr/sap";

/// Location of the systemd control binary.
pub const DEFAULT_SYSTEMCTL_PATH: &str = "/usr/bin/systemctl";

/// Directory holding administrator-installed systemd unit files.
pub const DEFAULT_UNIT_DIR: &str = "/etc/systemd/system";

/// Directory where `sapstartsrv` leaves its interprocess sockets.
pub const DEFAULT_SOCKET_DIR: &str = "/tmp";

/// Socket files left behind by a crashed `sapstartsrv`.
pub const STALE_SOCKET_NAMES: [&str; 2] = [".sapstream50013", ".sapstream50014"];

/// Default log filter expression used by the agent binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the agent binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default SAP installation root.
pub fn default_sap_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SAP_ROOT)
}

/// Default systemd control binary.
pub fn default_systemctl_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SYSTEMCTL_PATH)
}

/// Default unit-file directory.
pub fn default_unit_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_UNIT_DIR)
}

/// Default directory for `sapstartsrv` sockets.
pub fn default_socket_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_SOCKET_DIR)
}
