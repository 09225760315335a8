//! History CLI command

use crate::display::format_history;
use crate::error::RotateResult;
use crate::history::HistoryLogger;

/// Print the most recent `limit` run records
pub fn handle_history_command(logger: &HistoryLogger, limit: usize) -> RotateResult<()> {
    let records = logger.read_recent(limit)?;
    println!("{}", format_history(&records));
    Ok(())
}
