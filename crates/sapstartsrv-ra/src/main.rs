//! Binary entrypoint for the `SAPStartSrv` resource agent.
//!
//! Delegates to [`sapstartsrv_ra::run`]; the exit code is the OCF status.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    sapstartsrv_ra::run(std::env::args_os(), &mut stdout, &mut stderr)
}
