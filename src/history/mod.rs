//! Run history for syncrotate
//!
//! Keeps an append-only JSONL log of finished runs so that past syncs,
//! backups and rotations can be reviewed with `syncrotate history`.
//!
//! - `RunRecord`: one finished run with its id, timestamp and report
//! - `HistoryLogger`: appends records to and reads them from the log file

mod entry;
mod logger;

pub use entry::{RunOutcome, RunRecord};
pub use logger::HistoryLogger;
