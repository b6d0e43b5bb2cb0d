//! Start, stop and health-check flows for `sapstartsrv`.
//!
//! Every public operation re-runs initialisation: parse the instance
//! identifier, resolve the profile, locate the executables and export the
//! environment. A failed initialisation ends the operation with its status.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use sapstartsrv_config::HostLayout;
use tracing::{debug, error, info, warn};

use super::context::ExecutionContext;
use super::error::LifecycleError;
use crate::AGENT_TARGET;
use crate::environment::{self, EnvironmentStore};
use crate::locator::{BinaryProbe, ExecutableLocator, candidate_directories};
use crate::naming::InstanceIdentity;
use crate::ocf::{
    DIR_EXECUTABLE, DIR_PROFILE, InvocationKind, OcfStatus, ParameterSource, ResourceAction,
    SAP_INSTANCE_PROFILE, START_PROFILE,
};
use crate::process::{CommandLine, ProcessRunner};
use crate::service_mode::{ServiceManager, ServiceMode};

/// Host capabilities the controller depends on.
pub struct Collaborators<'a> {
    /// Executes external commands.
    pub runner: &'a dyn ProcessRunner,
    /// Checks executable presence.
    pub probe: &'a dyn BinaryProbe,
    /// Supplies resource parameters.
    pub parameters: &'a dyn ParameterSource,
    /// Receives exported variables.
    pub environment: &'a mut dyn EnvironmentStore,
}

/// Drives one SAP instance through its lifecycle.
pub struct LifecycleController<'a> {
    instance_name: String,
    layout: HostLayout,
    invocation: InvocationKind,
    services: Collaborators<'a>,
}

impl<'a> LifecycleController<'a> {
    /// Creates a controller for the composite identifier `instance_name`.
    pub fn new(
        instance_name: impl Into<String>,
        layout: HostLayout,
        invocation: InvocationKind,
        services: Collaborators<'a>,
    ) -> Self {
        Self {
            instance_name: instance_name.into(),
            layout,
            invocation,
            services,
        }
    }

    /// Dispatches `action` to its operation.
    ///
    /// `meta-data` needs no instance and is answered by the caller.
    pub fn handle(&mut self, action: ResourceAction) -> OcfStatus {
        match action {
            ResourceAction::Start => self.start(),
            ResourceAction::Stop => self.stop(),
            ResourceAction::Status => self.status(),
            ResourceAction::Monitor => self.monitor(),
            ResourceAction::ValidateAll => self.validate(),
            ResourceAction::MetaData => OcfStatus::ErrUnimplemented,
        }
    }

    /// Starts `sapstartsrv` through systemd or directly.
    pub fn start(&mut self) -> OcfStatus {
        let context = match self.initialize() {
            Ok(context) => context,
            Err(error) => return error.status(),
        };
        match self.service_manager().detect(context.unit_name()) {
            ServiceMode::Systemd => self.start_systemd_style(&context),
            ServiceMode::Sys5 => self.start_sys5_style(&context),
        }
    }

    /// Stops `sapstartsrv`; stopping a stopped instance succeeds.
    pub fn stop(&mut self) -> OcfStatus {
        let context = match self.initialize() {
            Ok(context) => context,
            Err(error) => return error.status(),
        };
        let label = context.identity().label();
        if !self.is_running(&context) {
            info!(target: AGENT_TARGET, "SAP Instance {label} already stopped");
            return OcfStatus::Success;
        }

        let command = CommandLine::new(context.executables().control())
            .arg("-nr")
            .arg(context.identity().instance_number())
            .args(["-function", "StopService"]);
        match self.services.runner.run(&command) {
            Ok(result) if result.success() => {
                info!(
                    target: AGENT_TARGET,
                    "Stopping sapstartsrv of SAP Instance {label}: {}",
                    result.stdout()
                );
                OcfStatus::Success
            }
            Ok(result) => {
                error!(
                    target: AGENT_TARGET,
                    "SAP Instance {label} stop failed: {}",
                    result.stderr()
                );
                OcfStatus::ErrGeneric
            }
            Err(failure) => {
                error!(target: AGENT_TARGET, "SAP Instance {label} stop failed: {failure}");
                OcfStatus::ErrGeneric
            }
        }
    }

    /// Reports whether `sapstartsrv` answers.
    pub fn status(&mut self) -> OcfStatus {
        match self.initialize() {
            Ok(context) => OcfStatus::from_running(self.is_running(&context)),
            Err(error) => error.status(),
        }
    }

    /// Probes query the instance; recurring ticks succeed without a query.
    pub fn monitor(&mut self) -> OcfStatus {
        let context = match self.initialize() {
            Ok(context) => context,
            Err(error) => return error.status(),
        };
        if self.invocation.is_probe() {
            return OcfStatus::from_running(self.is_running(&context));
        }
        // Recurring liveness is left to the systemd watchdog.
        OcfStatus::Success
    }

    /// Re-validates every identifier field.
    ///
    /// Only the identifier is inspected; executables and the environment
    /// are left alone.
    pub fn validate(&mut self) -> OcfStatus {
        let identity = match InstanceIdentity::parse(&self.instance_name) {
            Ok(identity) => identity,
            Err(invalid) => {
                error!(target: AGENT_TARGET, "{invalid}");
                return LifecycleError::from(invalid).status();
            }
        };
        match identity.validate() {
            Ok(()) => OcfStatus::Success,
            Err(invalid) => {
                error!(target: AGENT_TARGET, "{invalid}");
                LifecycleError::from(invalid).status()
            }
        }
    }

    pub(super) fn initialize(&mut self) -> Result<ExecutionContext, LifecycleError> {
        let identity = InstanceIdentity::parse(&self.instance_name)
            .inspect_err(|invalid| error!(target: AGENT_TARGET, "{invalid}"))?;
        let profile = self.resolve_profile(&identity);

        let instance_dir = self
            .layout
            .instance_dir(identity.system_id(), identity.instance_name());
        let override_dir = self.services.parameters.get(DIR_EXECUTABLE);
        let candidates = candidate_directories(override_dir.as_deref(), &instance_dir);
        let executables = ExecutableLocator::new(self.services.probe).locate(&candidates)?;

        environment::prepare(
            self.services.parameters,
            &mut *self.services.environment,
            executables.directory(),
        );
        debug!(
            target: AGENT_TARGET,
            instance = %self.instance_name,
            executables = %executables.directory().display(),
            profile = %profile.display(),
            "instance initialised"
        );
        Ok(ExecutionContext::new(identity, executables, profile))
    }

    fn resolve_profile(&self, identity: &InstanceIdentity) -> PathBuf {
        let parameters = self.services.parameters;
        if let Some(start_profile) = parameters.get(START_PROFILE) {
            return PathBuf::from(start_profile);
        }
        let profile_dir = parameters
            .get(DIR_PROFILE)
            .map_or_else(|| self.layout.profile_dir(identity.system_id()), PathBuf::from);
        let default_profile = profile_dir.join(&self.instance_name);
        parameters
            .get(SAP_INSTANCE_PROFILE)
            .map_or(default_profile, PathBuf::from)
    }

    fn service_manager(&self) -> ServiceManager<'_> {
        ServiceManager::new(self.services.runner, self.services.probe, &self.layout)
    }

    fn start_systemd_style(&self, context: &ExecutionContext) -> OcfStatus {
        let unit = context.unit_name();
        let manager = self.service_manager();
        if manager.is_unit_active(unit) {
            info!(target: AGENT_TARGET, "systemd service {unit} is active");
            return OcfStatus::Success;
        }

        warn!(
            target: AGENT_TARGET,
            "systemd service {unit} is not active, it will be started using systemd"
        );
        let started = match manager.start_unit(unit) {
            Ok(result) => result.success(),
            Err(failure) => {
                warn!(target: AGENT_TARGET, "{failure}");
                false
            }
        };
        if started {
            return OcfStatus::Success;
        }

        error!(target: AGENT_TARGET, "error during start of systemd unit {unit}!");
        if self.invocation.is_probe() {
            OcfStatus::NotRunning
        } else {
            OcfStatus::ErrGeneric
        }
    }

    fn start_sys5_style(&self, context: &ExecutionContext) -> OcfStatus {
        for socket in self.layout.stale_sockets() {
            if let Err(failure) = fs::remove_file(&socket) {
                debug!(
                    target: AGENT_TARGET,
                    socket = %socket.display(),
                    "stale socket not removed: {failure}"
                );
            }
        }

        let label = context.identity().label();
        let mut profile_argument = OsString::from("pf=");
        profile_argument.push(context.profile());
        let command = CommandLine::new(context.executables().starter())
            .arg(profile_argument)
            .args(["-D", "-u", context.sid_adm()]);
        let launched = match self.services.runner.run(&command) {
            Ok(result) => result,
            Err(failure) => {
                error!(
                    target: AGENT_TARGET,
                    "sapstartsrv for SAP Instance {label} start failed: {failure}"
                );
                return OcfStatus::ErrGeneric;
            }
        };

        if self.is_running(context) {
            info!(
                target: AGENT_TARGET,
                "sapstartsrv for SAP Instance {label} started: {}",
                launched.stdout()
            );
            OcfStatus::Success
        } else {
            error!(
                target: AGENT_TARGET,
                "sapstartsrv for SAP Instance {label} start failed: {}",
                launched.stderr()
            );
            OcfStatus::NotRunning
        }
    }

    /// Asks `sapcontrol` for the instance name; running iff it answers.
    fn is_running(&self, context: &ExecutionContext) -> bool {
        let command = CommandLine::new(context.executables().control())
            .arg("-nr")
            .arg(context.identity().instance_number())
            .args([
                "-function",
                "ParameterValue",
                "INSTANCE_NAME",
                "-format",
                "script",
            ]);
        match self.services.runner.run(&command) {
            Ok(result) => result.success(),
            Err(failure) => {
                warn!(target: AGENT_TARGET, "{failure}");
                false
            }
        }
    }
}
