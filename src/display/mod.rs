//! Display formatting for terminal output
//!
//! Turns run reports and history records into the human-readable status
//! lines printed by the CLI.

pub mod report;

pub use report::{
    format_history, format_rotation, format_rotation_totals, format_step, format_summary,
};
