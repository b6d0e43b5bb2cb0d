//! OCF resource agent for the `sapstartsrv` process of one SAP instance.
//!
//! The cluster manager runs the agent once per action. The agent parses the
//! composite instance identifier, locates the SAP executables, exports their
//! environment and then starts, stops or checks `sapstartsrv`. Outcomes are
//! reported as OCF status codes through the process exit code.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use sapstartsrv_config::Config;
use tracing::{debug, error};

mod cli;
mod config;
pub mod controller;
pub mod environment;
mod errors;
pub mod locator;
pub mod metadata;
pub mod naming;
pub mod ocf;
pub mod process;
pub mod service_mode;
pub mod telemetry;

#[cfg(test)]
mod tests;

use cli::Cli;
use config::{prepare_cli_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use controller::{Collaborators, LifecycleController};
use environment::ProcessEnvironment;
pub(crate) use errors::AppError;
use locator::FileSystemProbe;
use ocf::{INSTANCE_NAME, InvocationKind, OcfEnvironment, OcfStatus, ResourceAction};
use process::SystemProcessRunner;
use telemetry::{TelemetryError, TelemetryHandle};

/// `tracing` target for agent messages.
pub(crate) const AGENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::agent");

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `sapstartsrv_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--sap-root",
    "--systemctl-path",
    "--unit-dir",
    "--socket-dir",
];

type TelemetryInstaller = fn(&Config) -> Result<TelemetryHandle, TelemetryError>;

struct AgentRunner<'a, L: ConfigLoader> {
    loader: &'a L,
    install_telemetry: TelemetryInstaller,
}

impl<'a, L: ConfigLoader> AgentRunner<'a, L> {
    fn new(loader: &'a L) -> Self {
        Self {
            loader,
            install_telemetry: telemetry::initialise,
        }
    }

    #[cfg(test)]
    fn with_telemetry(mut self, install_telemetry: TelemetryInstaller) -> Self {
        self.install_telemetry = install_telemetry;
        self
    }

    fn run<W: Write, E: Write>(
        &self,
        args: Vec<OsString>,
        stdout: &mut W,
        stderr: &mut E,
        services: Collaborators<'_>,
    ) -> OcfStatus {
        match self.execute(&args, stdout, services) {
            Ok(status) => status,
            Err(AppError::CliUsage(usage))
                if matches!(
                    usage.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) =>
            {
                let _ = write!(stdout, "{usage}");
                OcfStatus::Success
            }
            Err(failure) => {
                let _ = writeln!(stderr, "{failure}");
                failure.status()
            }
        }
    }

    fn execute<W: Write>(
        &self,
        args: &[OsString],
        stdout: &mut W,
        services: Collaborators<'_>,
    ) -> Result<OcfStatus, AppError> {
        let split = split_config_arguments(args);
        let cli = Cli::try_parse_from(prepare_cli_arguments(args, &split))
            .map_err(AppError::CliUsage)?;
        let action = cli
            .action
            .parse::<ResourceAction>()
            .map_err(|_| AppError::UnknownAction(cli.action.clone()))?;
        if action == ResourceAction::MetaData {
            metadata::write(stdout).map_err(AppError::WriteMetadata)?;
            return Ok(OcfStatus::Success);
        }

        let config = self.loader.load(&split.config_arguments)?;
        (self.install_telemetry)(&config)?;

        let Some(instance_name) = services.parameters.get(INSTANCE_NAME) else {
            error!(
                target: AGENT_TARGET,
                "resource parameter {INSTANCE_NAME} is required for {action}"
            );
            return Ok(OcfStatus::ErrArgs);
        };
        let invocation = InvocationKind::classify(action, services.parameters);
        let mut controller =
            LifecycleController::new(instance_name, config.host_layout(), invocation, services);
        let status = controller.handle(action);
        debug!(target: AGENT_TARGET, %action, %status, "action finished");
        Ok(status)
    }
}

/// Runs the agent with the given arguments against the live host.
///
/// Resource parameters come from `OCF_RESKEY_*` variables; `meta-data`
/// output goes to `stdout` and usage errors to `stderr`.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut environment = ProcessEnvironment;
    let services = Collaborators {
        runner: &SystemProcessRunner,
        probe: &FileSystemProbe,
        parameters: &OcfEnvironment,
        environment: &mut environment,
    };
    let args: Vec<OsString> = args.into_iter().collect();
    AgentRunner::new(&OrthoConfigLoader)
        .run(args, stdout, stderr, services)
        .into()
}
