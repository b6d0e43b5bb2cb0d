//! Command-line surface of the `SAPStartSrv` binary.

use clap::Parser;

/// Arguments left after configuration flags have been split off.
#[derive(Debug, Parser)]
#[command(
    name = "SAPStartSrv",
    version,
    about = "OCF resource agent managing the sapstartsrv process of an SAP instance"
)]
pub(crate) struct Cli {
    /// OCF action: start, stop, status, monitor, validate-all or meta-data.
    #[arg(value_name = "ACTION")]
    pub(crate) action: String,
}
