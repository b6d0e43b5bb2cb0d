//! Open Cluster Framework surface: status codes, actions and parameters.
//!
//! The cluster manager invokes the agent once per action and hands resource
//! parameters over as `OCF_RESKEY_<name>` environment variables.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use strum::{Display, EnumString};

/// Prefix of environment variables carrying resource parameters.
pub const PARAMETER_PREFIX: &str = "OCF_RESKEY_";
/// Parameter holding the composite instance identifier.
pub const INSTANCE_NAME: &str = "InstanceName";
/// Parameter overriding the instance profile path.
pub const START_PROFILE: &str = "START_PROFILE";
/// Parameter overriding the executable directory.
pub const DIR_EXECUTABLE: &str = "DIR_EXECUTABLE";
/// Parameter overriding the profile directory.
pub const DIR_PROFILE: &str = "DIR_PROFILE";
/// Parameter naming the instance profile when no start profile is set.
pub const SAP_INSTANCE_PROFILE: &str = "SAP_INSTANCE_PROFILE";
/// Meta parameter carrying the recurring monitor interval in milliseconds.
pub const MONITOR_INTERVAL: &str = "CRM_meta_interval";

/// Fixed result vocabulary understood by the cluster manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OcfStatus {
    /// The action completed.
    Success,
    /// The action failed at runtime.
    ErrGeneric,
    /// The resource configuration is invalid.
    ErrArgs,
    /// The action is not implemented by this agent.
    ErrUnimplemented,
    /// The resource is cleanly stopped.
    NotRunning,
}

impl OcfStatus {
    /// Numeric code reported to the cluster manager.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::ErrGeneric => 1,
            Self::ErrArgs => 2,
            Self::ErrUnimplemented => 3,
            Self::NotRunning => 7,
        }
    }

    /// Maps a running flag to `Success` or `NotRunning`.
    #[must_use]
    pub const fn from_running(running: bool) -> Self {
        if running {
            Self::Success
        } else {
            Self::NotRunning
        }
    }
}

impl From<OcfStatus> for ExitCode {
    fn from(status: OcfStatus) -> Self {
        Self::from(status.code())
    }
}

/// Actions the agent answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceAction {
    /// Start `sapstartsrv`.
    Start,
    /// Stop `sapstartsrv`.
    Stop,
    /// Report whether `sapstartsrv` is running.
    Status,
    /// Probe or recurring health check.
    Monitor,
    /// Check the resource configuration.
    ValidateAll,
    /// Print the agent description.
    MetaData,
}

/// Distinguishes one-shot probes from recurring monitor ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// One-shot check, e.g. when the cluster discovers resource state.
    Probe,
    /// Any other invocation, including recurring monitor ticks.
    Recurring,
}

impl InvocationKind {
    /// Classifies an invocation.
    ///
    /// A probe is a `monitor` call whose interval is `0` or absent.
    pub fn classify(action: ResourceAction, parameters: &dyn ParameterSource) -> Self {
        let interval = parameters.get(MONITOR_INTERVAL);
        let zero_interval = interval.as_deref().is_none_or(|value| value == "0");
        if action == ResourceAction::Monitor && zero_interval {
            Self::Probe
        } else {
            Self::Recurring
        }
    }

    /// Returns `true` for one-shot probes.
    #[must_use]
    pub const fn is_probe(self) -> bool {
        matches!(self, Self::Probe)
    }
}

/// Lookup of resource parameters.
pub trait ParameterSource {
    /// Returns the parameter value, treating empty values as unset.
    fn get(&self, name: &str) -> Option<String>;

    /// Returns the parameter value or `default` when unset or empty.
    fn get_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_owned())
    }
}

/// Parameters read from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct OcfEnvironment;

impl ParameterSource for OcfEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        env::var(format!("{PARAMETER_PREFIX}{name}"))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// Parameters held in memory, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticParameters {
    values: HashMap<String, String>,
}

impl StaticParameters {
    /// Returns a copy with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_owned(), value.to_owned());
        self
    }
}

impl ParameterSource for StaticParameters {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}
