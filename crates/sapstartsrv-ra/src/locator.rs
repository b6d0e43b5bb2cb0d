//! Discovery of the `sapstartsrv` and `sapcontrol` executables.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::error;

use crate::AGENT_TARGET;

/// File name of the service starter.
pub const STARTER_BINARY: &str = "sapstartsrv";
/// File name of the control utility.
pub const CONTROL_BINARY: &str = "sapcontrol";

/// Errors raised while locating the instance executables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// No candidate directory contained both executables.
    #[error("Cannot find sapstartsrv and sapcontrol executable in {}", directory.display())]
    ExecutableNotFound {
        /// Last directory searched.
        directory: PathBuf,
    },
}

/// Answers whether a path names a runnable program.
pub trait BinaryProbe {
    /// Returns `true` when `path` is executable.
    ///
    /// Bare program names are looked up on `PATH`.
    fn is_executable(&self, path: &Path) -> bool;
}

/// Probe backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystemProbe;

impl BinaryProbe for FileSystemProbe {
    fn is_executable(&self, path: &Path) -> bool {
        if path.components().count() > 1 {
            return is_executable_file(path);
        }
        which::which(path).is_ok()
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// Paths of the two executables, found side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutables {
    directory: PathBuf,
    starter: PathBuf,
    control: PathBuf,
}

impl ResolvedExecutables {
    fn in_directory(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            starter: directory.join(STARTER_BINARY),
            control: directory.join(CONTROL_BINARY),
        }
    }

    /// Directory holding both executables.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Absolute path to `sapstartsrv`.
    #[must_use]
    pub fn starter(&self) -> &Path {
        &self.starter
    }

    /// Absolute path to `sapcontrol`.
    #[must_use]
    pub fn control(&self) -> &Path {
        &self.control
    }
}

/// Lists the directories to search, in priority order.
///
/// An empty override is ignored. The instance `exe` directory and its `run`
/// subdirectory always follow.
#[must_use]
pub fn candidate_directories(override_dir: Option<&str>, instance_dir: &Path) -> Vec<PathBuf> {
    let exe = instance_dir.join("exe");
    let run = exe.join("run");
    override_dir
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .into_iter()
        .chain([exe, run])
        .collect()
}

/// Walks candidate directories until one holds both executables.
pub struct ExecutableLocator<'a> {
    probe: &'a dyn BinaryProbe,
}

impl<'a> ExecutableLocator<'a> {
    /// Creates a locator using `probe` for presence checks.
    pub fn new(probe: &'a dyn BinaryProbe) -> Self {
        Self { probe }
    }

    /// Returns the first candidate containing both executables.
    ///
    /// The starter is probed first; the control utility is only probed when
    /// the starter is present. Every rejected directory is logged.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::ExecutableNotFound`] naming the last candidate
    /// when none matches.
    pub fn locate(&self, candidates: &[PathBuf]) -> Result<ResolvedExecutables, LocatorError> {
        let mut last = None;
        for directory in candidates {
            let resolved = ResolvedExecutables::in_directory(directory);
            if self.probe.is_executable(resolved.starter())
                && self.probe.is_executable(resolved.control())
            {
                return Ok(resolved);
            }
            let missing = LocatorError::ExecutableNotFound {
                directory: directory.clone(),
            };
            error!(target: AGENT_TARGET, "{missing}");
            last = Some(missing);
        }
        Err(last.unwrap_or_else(|| LocatorError::ExecutableNotFound {
            directory: PathBuf::new(),
        }))
    }
}
