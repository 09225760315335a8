//! Core data models for syncrotate
//!
//! This module contains the data structures that describe a backup run:
//! snapshot identifiers, retention policies, transfer invocations, workflow
//! variants and the per-step report.

pub mod report;
pub mod retention;
pub mod snapshot;
pub mod transfer;
pub mod workflow;

pub use report::{PurgeOutcome, RotationReport, Step, StepReport, StepStatus, WorkflowReport};
pub use retention::{RetentionKind, RetentionPolicy};
pub use snapshot::{SnapshotId, SnapshotSet};
pub use transfer::{join_remote, TransferOp, TransferSpec};
pub use workflow::{Orientation, SyncPosition, Workflow, WorkflowPlan};
