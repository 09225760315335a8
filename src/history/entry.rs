//! Run history records
//!
//! One record is written per invocation: either a full workflow report or
//! the result of a standalone prune.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{RotationReport, WorkflowReport};

/// What a recorded run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RunOutcome {
    /// A sync/backup/rotate workflow
    Workflow { report: WorkflowReport },
    /// A rotation-only pass
    Prune {
        backup_root: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<RotationReport>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// A single run history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique id of the run
    pub run_id: Uuid,

    /// When the run finished (UTC)
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl RunRecord {
    /// Record a finished workflow
    pub fn workflow(report: WorkflowReport) -> Self {
        Self::new(RunOutcome::Workflow { report })
    }

    /// Record a finished prune
    pub fn prune(
        backup_root: impl Into<String>,
        result: &Result<RotationReport, crate::error::RotateError>,
    ) -> Self {
        let (rotation, error) = match result {
            Ok(rotation) => (Some(rotation.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self::new(RunOutcome::Prune {
            backup_root: backup_root.into(),
            rotation,
            error,
        })
    }

    fn new(outcome: RunOutcome) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            outcome,
        }
    }

    /// Whether any part of the run failed
    pub fn has_failures(&self) -> bool {
        match &self.outcome {
            RunOutcome::Workflow { report } => report.has_failures(),
            RunOutcome::Prune {
                rotation, error, ..
            } => error.is_some() || rotation.as_ref().map_or(false, |r| r.failure_count() > 0),
        }
    }

    /// Format the record as a one-line summary
    pub fn format_human_readable(&self) -> String {
        let status = if self.has_failures() { "FAILED" } else { "OK" };
        let id = self.run_id.to_string();
        let mut output = format!(
            "[{}] {} {:<6}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            &id[..8],
            status
        );

        match &self.outcome {
            RunOutcome::Workflow { report } => {
                output.push_str(&format!(" {} snapshot {}", report.workflow, report.snapshot));
                let failed = report.failed_steps();
                if !failed.is_empty() {
                    let names: Vec<String> = failed.iter().map(|s| s.to_string()).collect();
                    output.push_str(&format!(" (failed: {})", names.join(", ")));
                }
            }
            RunOutcome::Prune {
                backup_root,
                rotation,
                error,
            } => {
                output.push_str(&format!(" prune {}", backup_root));
                if let Some(rotation) = rotation {
                    output.push_str(&format!(", {} deleted", rotation.deleted().count()));
                }
                if let Some(error) = error {
                    output.push_str(&format!("\n  Error: {}", error));
                }
            }
        }

        output
    }
}
