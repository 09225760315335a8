//! Backup workflow variants
//!
//! All workflows are built from the same three steps (sync, backup, rotate).
//! A `WorkflowPlan` captures how a variant orients and orders them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::retention::RetentionKind;
use super::transfer::TransferOp;

/// Supported backup workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    /// Bidirectional local/remote sync with age-retained backups
    Bisync,
    /// Local overwrites remote, age-retained backups
    Mirror,
    /// Local copied onto remote, age-retained backups
    Push,
    /// Remote overwrites local after a count-retained backup
    Pull,
}

/// Which side of a transfer comes first on the tool's command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Local path is the source (path A)
    LocalFirst,
    /// Remote path is the source (path A)
    RemoteFirst,
}

impl Orientation {
    /// Order a (local, remote) pair into (source, destination)
    pub fn arrange(self, local: String, remote: String) -> (String, String) {
        match self {
            Orientation::LocalFirst => (local, remote),
            Orientation::RemoteFirst => (remote, local),
        }
    }
}

/// Position of the main sync step relative to backup and rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPosition {
    /// sync, backup, rotate
    First,
    /// backup, rotate, sync
    Last,
}

/// How one workflow drives the transfer tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowPlan {
    pub sync_op: TransferOp,
    pub sync_orientation: Orientation,
    pub backup_op: TransferOp,
    pub backup_orientation: Orientation,
    /// Pass the first-run flag to the backup transfer
    pub backup_resync: bool,
    pub sync_position: SyncPosition,
    pub default_retention: RetentionKind,
}

impl Workflow {
    pub fn plan(&self) -> WorkflowPlan {
        match self {
            Workflow::Bisync => WorkflowPlan {
                sync_op: TransferOp::Bisync,
                sync_orientation: Orientation::RemoteFirst,
                backup_op: TransferOp::Bisync,
                backup_orientation: Orientation::RemoteFirst,
                backup_resync: true,
                sync_position: SyncPosition::First,
                default_retention: RetentionKind::Age,
            },
            Workflow::Mirror => WorkflowPlan {
                sync_op: TransferOp::Mirror,
                sync_orientation: Orientation::LocalFirst,
                backup_op: TransferOp::Mirror,
                backup_orientation: Orientation::LocalFirst,
                backup_resync: false,
                sync_position: SyncPosition::First,
                default_retention: RetentionKind::Age,
            },
            Workflow::Push => WorkflowPlan {
                sync_op: TransferOp::Sync,
                sync_orientation: Orientation::LocalFirst,
                backup_op: TransferOp::Sync,
                backup_orientation: Orientation::LocalFirst,
                backup_resync: false,
                sync_position: SyncPosition::First,
                default_retention: RetentionKind::Age,
            },
            Workflow::Pull => WorkflowPlan {
                sync_op: TransferOp::Mirror,
                sync_orientation: Orientation::RemoteFirst,
                backup_op: TransferOp::Mirror,
                backup_orientation: Orientation::LocalFirst,
                backup_resync: false,
                sync_position: SyncPosition::Last,
                default_retention: RetentionKind::Count,
            },
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Bisync => write!(f, "bisync"),
            Workflow::Mirror => write!(f, "mirror"),
            Workflow::Push => write!(f, "push"),
            Workflow::Pull => write!(f, "pull"),
        }
    }
}
