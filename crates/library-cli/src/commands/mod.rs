//! Command handlers.
//!
//! Each handler takes the shared `AppContext` and its own argument struct.

mod check;
mod init;
mod list;
mod misc;
mod report;
mod shell;

pub use check::handle_check;
pub use init::handle_init;
pub use list::handle_list;
pub use misc::handle_completions;
pub use report::{handle_report, SummaryReport};
pub use shell::handle_shell;

use crate::errors::CliError;
use crate::ui::parse_format;

/// Validate `--format` and reject it alongside `--json`.
pub(crate) fn output_format(json: bool, format: Option<&str>) -> anyhow::Result<Option<&str>> {
    let format = parse_format(format).map_err(|e| CliError::invalid_input(e.to_string()))?;
    if json && format.is_some() {
        return Err(CliError::invalid_input("--format cannot be combined with --json").into());
    }
    Ok(format)
}
