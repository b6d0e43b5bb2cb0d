//! Per-invocation state gathered by initialisation.

use std::path::{Path, PathBuf};

use crate::locator::ResolvedExecutables;
use crate::naming::InstanceIdentity;

/// Everything an operation needs once the instance has been resolved.
///
/// Rebuilt on every public operation; nothing carries over between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    identity: InstanceIdentity,
    executables: ResolvedExecutables,
    profile: PathBuf,
    sid_adm: String,
    unit_name: String,
}

impl ExecutionContext {
    pub(crate) fn new(
        identity: InstanceIdentity,
        executables: ResolvedExecutables,
        profile: PathBuf,
    ) -> Self {
        let sid_adm = identity.sid_adm();
        let unit_name = identity.unit_name();
        Self {
            identity,
            executables,
            profile,
            sid_adm,
            unit_name,
        }
    }

    /// Parsed instance identity.
    #[must_use]
    pub const fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    /// Resolved `sapstartsrv` and `sapcontrol` paths.
    #[must_use]
    pub const fn executables(&self) -> &ResolvedExecutables {
        &self.executables
    }

    /// Instance profile passed to `sapstartsrv`.
    #[must_use]
    pub fn profile(&self) -> &Path {
        &self.profile
    }

    /// Account `sapstartsrv` runs as.
    #[must_use]
    pub fn sid_adm(&self) -> &str {
        &self.sid_adm
    }

    /// systemd unit owning `sapstartsrv`.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }
}
