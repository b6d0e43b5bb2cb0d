//! Test doubles and fixtures shared by the agent test suites.
//!
//! The host is simulated: external commands are answered by a scripted
//! runner, executable presence by an in-memory set and the filesystem paths
//! the agent touches live under a temporary directory.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rstest::fixture;
use sapstartsrv_config::HostLayout;
use tempfile::TempDir;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;

use crate::controller::{Collaborators, LifecycleController};
use crate::environment::MemoryEnvironment;
use crate::locator::{BinaryProbe, CONTROL_BINARY, STARTER_BINARY};
use crate::naming::InstanceIdentity;
use crate::ocf::{InvocationKind, OcfStatus, ResourceAction, StaticParameters};
use crate::process::{CommandLine, CommandResult, ProcessError, ProcessRunner};

/// Composite identifier used throughout the suites.
pub(crate) const INSTANCE: &str = "PRD_ASCS00_virthost";

enum Outcome {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    SpawnFailure,
}

struct Rule {
    pattern: String,
    outcome: Outcome,
}

/// Answers commands from scripted rules and records every rendered command.
///
/// The most recently added rule whose pattern occurs in the rendered command
/// wins. Unscripted commands exit with code 1.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    /// Scripts commands containing `pattern` to exit with `code`.
    pub(crate) fn respond(&self, pattern: &str, code: i32, stdout: &str, stderr: &str) {
        self.rules.borrow_mut().push(Rule {
            pattern: pattern.to_owned(),
            outcome: Outcome::Exit {
                code,
                stdout: stdout.to_owned(),
                stderr: stderr.to_owned(),
            },
        });
    }

    /// Scripts commands containing `pattern` to fail before running.
    pub(crate) fn fail_spawn(&self, pattern: &str) {
        self.rules.borrow_mut().push(Rule {
            pattern: pattern.to_owned(),
            outcome: Outcome::SpawnFailure,
        });
    }

    /// Rendered commands in issue order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Returns `true` when any issued command contains `pattern`.
    pub(crate) fn issued(&self, pattern: &str) -> bool {
        self.calls.borrow().iter().any(|call| call.contains(pattern))
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandResult, ProcessError> {
        let rendered = command.to_string();
        self.calls.borrow_mut().push(rendered.clone());
        let rules = self.rules.borrow();
        let Some(rule) = rules
            .iter()
            .rev()
            .find(|rule| rendered.contains(&rule.pattern))
        else {
            return Ok(CommandResult::new(rendered, 1, "", "unscripted command"));
        };
        match &rule.outcome {
            Outcome::Exit {
                code,
                stdout,
                stderr,
            } => Ok(CommandResult::new(rendered, *code, stdout, stderr)),
            Outcome::SpawnFailure => Err(ProcessError::Spawn {
                command: rendered,
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Executables known to exist on the simulated host.
#[derive(Default)]
pub(crate) struct ExecutableSet {
    paths: RefCell<HashSet<PathBuf>>,
}

impl ExecutableSet {
    /// Marks `path` as executable.
    pub(crate) fn install(&self, path: impl Into<PathBuf>) {
        self.paths.borrow_mut().insert(path.into());
    }
}

impl BinaryProbe for ExecutableSet {
    fn is_executable(&self, path: &Path) -> bool {
        self.paths.borrow().contains(path)
    }
}

/// Collects formatted `tracing` output in memory.
#[derive(Clone, Default)]
pub(crate) struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

pub(crate) struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl LogCapture {
    fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::INFO)
            .finish()
    }

    /// Runs `operation` with this capture as the thread's subscriber.
    pub(crate) fn in_scope<T>(&self, operation: impl FnOnce() -> T) -> T {
        tracing::subscriber::with_default(self.subscriber(), operation)
    }

    /// Captured log lines.
    pub(crate) fn lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Returns `true` when a line at `level` contains `message`.
    pub(crate) fn contains(&self, level: &str, message: &str) -> bool {
        self.lines()
            .iter()
            .any(|line| line.contains(level) && line.contains(message))
    }
}

/// A simulated host rooted in a temporary directory.
pub(crate) struct TestHost {
    _dir: TempDir,
    pub(crate) layout: HostLayout,
    pub(crate) runner: ScriptedRunner,
    pub(crate) probe: ExecutableSet,
    pub(crate) parameters: StaticParameters,
    pub(crate) environment: MemoryEnvironment,
    pub(crate) logs: LogCapture,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let layout = HostLayout::new(
            dir.path().join("usr/sap"),
            dir.path().join("usr/bin/systemctl"),
            dir.path().join("etc/systemd/system"),
            dir.path().join("tmp"),
        );
        fs::create_dir_all(layout.unit_dir()).expect("unit dir");
        fs::create_dir_all(layout.socket_dir()).expect("socket dir");
        Self {
            _dir: dir,
            layout,
            runner: ScriptedRunner::default(),
            probe: ExecutableSet::default(),
            parameters: StaticParameters::default(),
            environment: MemoryEnvironment::default(),
            logs: LogCapture::default(),
        }
    }

    /// `exe` directory of the instance named by `composite`.
    pub(crate) fn exe_dir(&self, composite: &str) -> PathBuf {
        let identity = InstanceIdentity::parse(composite).expect("parsable identifier");
        self.layout
            .instance_dir(identity.system_id(), identity.instance_name())
            .join("exe")
    }

    /// Installs both SAP executables into `directory`.
    pub(crate) fn install_executables(&self, directory: &Path) {
        self.probe.install(directory.join(STARTER_BINARY));
        self.probe.install(directory.join(CONTROL_BINARY));
    }

    pub(crate) fn install_systemctl(&self) {
        self.probe.install(self.layout.systemctl());
    }

    pub(crate) fn install_unit_file(&self, unit: &str) {
        fs::write(self.layout.unit_path(unit), "[Unit]\n").expect("write unit file");
    }

    pub(crate) fn create_stale_sockets(&self) {
        for socket in self.layout.stale_sockets() {
            fs::write(socket, "").expect("write stale socket");
        }
    }

    pub(crate) fn stale_sockets_present(&self) -> bool {
        self.layout.stale_sockets().iter().any(|socket| socket.exists())
    }

    pub(crate) fn set_parameter(&mut self, name: &str, value: &str) {
        self.parameters = std::mem::take(&mut self.parameters).with(name, value);
    }

    pub(crate) fn controller(
        &mut self,
        instance: &str,
        invocation: InvocationKind,
    ) -> LifecycleController<'_> {
        LifecycleController::new(
            instance,
            self.layout.clone(),
            invocation,
            Collaborators {
                runner: &self.runner,
                probe: &self.probe,
                parameters: &self.parameters,
                environment: &mut self.environment,
            },
        )
    }

    /// Runs `action` with logs captured.
    pub(crate) fn run(
        &mut self,
        instance: &str,
        action: ResourceAction,
        invocation: InvocationKind,
    ) -> OcfStatus {
        let logs = self.logs.clone();
        let mut controller = self.controller(instance, invocation);
        logs.in_scope(|| controller.handle(action))
    }
}

#[fixture]
pub(crate) fn host() -> TestHost {
    TestHost::new()
}
