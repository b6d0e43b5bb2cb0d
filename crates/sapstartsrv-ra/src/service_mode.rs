//! Chooses between systemd-managed and direct ("sys5") start.

use sapstartsrv_config::HostLayout;
use tracing::{debug, warn};

use crate::AGENT_TARGET;
use crate::locator::BinaryProbe;
use crate::process::{CommandLine, CommandResult, ProcessError, ProcessRunner};

/// How `sapstartsrv` is started on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// A systemd unit owns `sapstartsrv`.
    Systemd,
    /// `sapstartsrv` is launched directly.
    Sys5,
}

/// Queries and drives the host service manager.
pub struct ServiceManager<'a> {
    runner: &'a dyn ProcessRunner,
    probe: &'a dyn BinaryProbe,
    layout: &'a HostLayout,
}

impl<'a> ServiceManager<'a> {
    /// Creates a service manager client.
    pub fn new(
        runner: &'a dyn ProcessRunner,
        probe: &'a dyn BinaryProbe,
        layout: &'a HostLayout,
    ) -> Self {
        Self {
            runner,
            probe,
            layout,
        }
    }

    /// Decides the start mode for `unit`.
    ///
    /// Without `systemctl` the host is sys5. An installed unit file selects
    /// systemd without spawning anything; otherwise the unit listing decides.
    pub fn detect(&self, unit: &str) -> ServiceMode {
        if !self.probe.is_executable(self.layout.systemctl()) {
            debug!(target: AGENT_TARGET, "systemctl not available");
            return ServiceMode::Sys5;
        }
        if self.layout.unit_path(unit).exists() {
            return ServiceMode::Systemd;
        }
        match self.systemctl("list-unit-files", unit) {
            Ok(result) if result.success() && result.stdout().contains(unit) => {
                ServiceMode::Systemd
            }
            Ok(_) => ServiceMode::Sys5,
            Err(error) => {
                warn!(target: AGENT_TARGET, "{error}");
                ServiceMode::Sys5
            }
        }
    }

    /// Returns `true` when `systemctl is-active` exits with code zero.
    pub fn is_unit_active(&self, unit: &str) -> bool {
        match self.systemctl("is-active", unit) {
            Ok(result) => result.success(),
            Err(error) => {
                warn!(target: AGENT_TARGET, "{error}");
                false
            }
        }
    }

    /// Issues `systemctl start` for `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError`] when `systemctl` cannot be spawned.
    pub fn start_unit(&self, unit: &str) -> Result<CommandResult, ProcessError> {
        self.systemctl("start", unit)
    }

    fn systemctl(&self, verb: &str, unit: &str) -> Result<CommandResult, ProcessError> {
        let command = CommandLine::new(self.layout.systemctl())
            .arg(verb)
            .arg(unit);
        self.runner.run(&command)
    }
}
