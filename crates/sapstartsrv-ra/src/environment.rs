//! Process environment handed to `sapstartsrv` and `sapcontrol`.

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::ocf::{PARAMETER_PREFIX, ParameterSource};

/// Parameter bounding how long the start of an instance may take.
pub const START_WAITTIME: &str = "START_WAITTIME";
/// Default start wait time in seconds.
pub const DEFAULT_START_WAITTIME: &str = "3600";
/// Parameter listing the SAP services to watch.
pub const MONITOR_SERVICES: &str = "MONITOR_SERVICES";
/// Services watched unless configured otherwise.
pub const DEFAULT_MONITOR_SERVICES: &str =
    "disp+work|msg_server|enserver|enrepserver|jcontrol|jstart|enq_server|enq_replicator";
/// Library search path extended with the executable directory.
pub const LIBRARY_PATH: &str = "LD_LIBRARY_PATH";

/// Mutable view over environment variables.
pub trait EnvironmentStore {
    /// Returns the variable value if it is set.
    fn get(&self, key: &str) -> Option<OsString>;
    /// Sets `key` to `value`.
    fn set(&mut self, key: &str, value: &OsStr);
}

/// The environment of the current process.
#[derive(Debug, Default)]
pub struct ProcessEnvironment;

impl EnvironmentStore for ProcessEnvironment {
    fn get(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }

    fn set(&mut self, key: &str, value: &OsStr) {
        // The agent is single threaded; child processes inherit these values.
        unsafe { env::set_var(key, value) };
    }
}

/// An environment held in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnvironment {
    values: HashMap<String, OsString>,
}

impl MemoryEnvironment {
    /// Returns a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.values.insert(key.to_owned(), value.into());
        self
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn get(&self, key: &str) -> Option<OsString> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &OsStr) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// Exports tunables and the library path for the resolved executables.
///
/// `START_WAITTIME` and `MONITOR_SERVICES` keep any non-empty value already
/// present in the environment; otherwise the configured parameter or its
/// default is exported. `exe_dir` is appended to the library path.
pub fn prepare(
    parameters: &dyn ParameterSource,
    environment: &mut dyn EnvironmentStore,
    exe_dir: &Path,
) {
    for (name, default) in [
        (START_WAITTIME, DEFAULT_START_WAITTIME),
        (MONITOR_SERVICES, DEFAULT_MONITOR_SERVICES),
    ] {
        let key = format!("{PARAMETER_PREFIX}{name}");
        if environment.get(&key).is_none_or(|value| value.is_empty()) {
            environment.set(&key, OsStr::new(&parameters.get_or(name, default)));
        }
    }

    let library_path = match environment.get(LIBRARY_PATH) {
        Some(mut existing) if !existing.is_empty() => {
            existing.push(":");
            existing.push(exe_dir);
            existing
        }
        _ => exe_dir.as_os_str().to_owned(),
    };
    environment.set(LIBRARY_PATH, &library_path);
}
