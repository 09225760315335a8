//! Outcome of one orchestrated run
//!
//! Every step is reported independently; a failed step never hides the
//! result of the steps that ran after it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::retention::RetentionPolicy;
use super::snapshot::SnapshotId;
use super::workflow::Workflow;

/// The three primitives a workflow is composed of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Sync,
    Backup,
    Rotate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Sync => write!(f, "Sync"),
            Step::Backup => write!(f, "Backup"),
            Step::Rotate => write!(f, "Rotation"),
        }
    }
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed { message: String },
}

impl StepStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            StepStatus::Succeeded => None,
            StepStatus::Failed { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

impl StepReport {
    pub fn succeeded(step: Step) -> Self {
        Self {
            step,
            status: StepStatus::Succeeded,
        }
    }

    pub fn failed(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Failed {
                message: message.into(),
            },
        }
    }
}

/// Result of deleting one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeOutcome {
    pub snapshot: SnapshotId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PurgeOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Details of a rotation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationReport {
    pub policy: RetentionPolicy,
    /// Valid snapshots found under the backup root
    pub found: usize,
    /// Listing entries ignored because they are not dated snapshots
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    /// Snapshots the policy selected for deletion, oldest first
    pub selected: Vec<SnapshotId>,
    /// One outcome per attempted purge; empty on a dry run
    pub purges: Vec<PurgeOutcome>,
    #[serde(default)]
    pub dry_run: bool,
}

impl RotationReport {
    pub fn deleted(&self) -> impl Iterator<Item = &SnapshotId> {
        self.purges
            .iter()
            .filter(|p| p.is_success())
            .map(|p| &p.snapshot)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PurgeOutcome> {
        self.purges.iter().filter(|p| !p.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Everything that happened during one workflow invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub workflow: Workflow,
    pub snapshot: SnapshotId,
    /// Steps in the order they ran
    pub steps: Vec<StepReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationReport>,
}

impl WorkflowReport {
    pub fn new(workflow: Workflow, snapshot: SnapshotId) -> Self {
        Self {
            workflow,
            snapshot,
            steps: Vec::new(),
            rotation: None,
        }
    }

    pub fn step(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(|s| !s.status.is_success())
    }

    pub fn failed_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|s| !s.status.is_success())
            .map(|s| s.step)
            .collect()
    }
}
