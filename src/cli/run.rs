//! Workflow CLI commands
//!
//! Implements the `bisync`, `mirror`, `push` and `pull` subcommands.

use clap::Args;
use tracing::warn;

use crate::config::{RunConfig, RunOverrides, Settings};
use crate::display::{format_step, format_summary};
use crate::error::RotateResult;
use crate::history::{HistoryLogger, RunRecord};
use crate::models::{RetentionKind, StepStatus, Workflow};
use crate::services::{BackupOrchestrator, Clock};
use crate::transfer::TransferTool;

/// Retention flags shared by workflows and `prune`
#[derive(Args, Debug, Clone, Default)]
pub struct RetentionArgs {
    /// Retention limit: days to keep (age) or backups to keep (count)
    #[arg(long = "backup-retention", value_name = "N")]
    pub backup_retention: Option<u32>,

    /// Retention policy, overriding the workflow's default
    #[arg(long = "retention-policy", value_enum, value_name = "POLICY")]
    pub retention_policy: Option<RetentionKind>,
}

/// Arguments common to every workflow
#[derive(Args, Debug, Clone)]
pub struct WorkflowArgs {
    /// Local directory to sync
    #[arg(long = "local-directory", value_name = "PATH")]
    pub local_directory: String,

    /// Remote destination (e.g. gdrive:Documents)
    #[arg(
        long = "remote-destination",
        visible_alias = "cloud-destination",
        value_name = "REMOTE"
    )]
    pub remote_destination: String,

    /// Root under which dated backups are kept
    #[arg(long = "backup-destination", value_name = "PATH")]
    pub backup_destination: String,

    #[command(flatten)]
    pub retention: RetentionArgs,

    /// Extra argument forwarded to the transfer tool (repeatable)
    #[arg(long = "extra-args", value_name = "ARG", allow_hyphen_values = true)]
    pub extra_args: Vec<String>,

    /// Report which backups would be deleted without deleting them
    #[arg(long)]
    pub dry_run: bool,
}

impl WorkflowArgs {
    /// Merge these flags with settings into a run configuration
    pub fn into_run_config(
        self,
        workflow: Workflow,
        settings: &Settings,
    ) -> RotateResult<RunConfig> {
        let overrides = RunOverrides {
            retention_kind: self.retention.retention_policy,
            retention_limit: self.retention.backup_retention,
            extra_args: self.extra_args,
            dry_run: self.dry_run,
        };
        RunConfig::resolve(
            workflow,
            self.local_directory,
            self.remote_destination,
            self.backup_destination,
            overrides,
            settings,
        )
    }
}

/// Handle a workflow command
///
/// Returns `true` when any step failed.
pub fn handle_workflow_command(
    tool: &dyn TransferTool,
    clock: &dyn Clock,
    settings: &Settings,
    history: Option<&HistoryLogger>,
    workflow: Workflow,
    args: WorkflowArgs,
) -> RotateResult<bool> {
    let config = args.into_run_config(workflow, settings)?;
    let orchestrator = BackupOrchestrator::new(tool, clock, &config);

    let report = orchestrator.run_observed(|step, rotation| {
        let text = format_step(step, rotation);
        match step.status {
            StepStatus::Succeeded => println!("{}", text),
            StepStatus::Failed { .. } => eprintln!("{}", text),
        }
    });

    println!();
    print!("{}", format_summary(&report));

    let failed = report.has_failures();
    if let Some(logger) = history {
        if let Err(e) = logger.log(&RunRecord::workflow(report)) {
            warn!(
                path = %logger.path().display(),
                error = %e,
                "could not record run history"
            );
        }
    }

    Ok(failed)
}
