//! Output formats for agent diagnostics.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How agent log records are rendered on stderr.
///
/// Pacemaker captures stderr into its own log, so the agent defaults to
/// one compact line per event.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Level, target and message on a single line.
    #[default]
    Compact,
    /// One flattened JSON object per event.
    Json,
}
