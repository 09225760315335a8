//! Service layer for syncrotate
//!
//! The service layer holds the backup policy itself: naming today's snapshot,
//! deciding which snapshots to retain, and sequencing the steps of a workflow
//! on top of the transfer tool.

pub mod namer;
pub mod orchestrator;
pub mod retention;

pub use namer::{snapshot_for, today, Clock, FixedClock, SystemClock};
pub use orchestrator::BackupOrchestrator;
pub use retention::{cutoff, select_for_deletion, Rotator};
