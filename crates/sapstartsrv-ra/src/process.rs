//! Synchronous subprocess execution with captured output.
//!
//! Every external command the agent issues (`systemctl`, `sapstartsrv`,
//! `sapcontrol`) is described as an argv vector and executed without a shell.
//! The caller blocks until the child exits and both output streams are read.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::AGENT_TARGET;

/// Errors raised while launching an external command.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command could not be spawned or its output could not be collected.
    #[error("failed to run '{command}': {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

/// An external command expressed as a program plus argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Creates a command line for `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program, excluding argv\[0\].
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.program.display())?;
        for arg in &self.args {
            write!(formatter, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of a finished command.
///
/// Output streams are stored trimmed so log messages and comparisons do not
/// carry trailing newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    command: String,
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl CommandResult {
    /// Builds a result, trimming both output streams.
    pub fn new(command: impl Into<String>, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            command: command.into(),
            exit_code,
            stdout: stdout.trim().to_owned(),
            stderr: stderr.trim().to_owned(),
        }
    }

    /// Rendered command line that produced this result.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Exit code; negative signal numbers for signal-terminated children.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Trimmed standard output.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Trimmed standard error.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns `true` when the command exited with code zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes external commands on behalf of the agent.
pub trait ProcessRunner {
    /// Runs `command` to completion and captures its output.
    fn run(&self, command: &CommandLine) -> Result<CommandResult, ProcessError>;
}

/// Runner backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandResult, ProcessError> {
        let rendered = command.to_string();
        let output = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: rendered.clone(),
                source,
            })?;
        let exit_code = exit_code(output.status);
        debug!(
            target: AGENT_TARGET,
            command = %rendered,
            exit_code,
            "command finished"
        );
        Ok(CommandResult::new(
            rendered,
            exit_code,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        ))
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
