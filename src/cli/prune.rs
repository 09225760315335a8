//! Prune CLI command
//!
//! Applies a retention policy to a backup root without syncing anything.

use clap::Args;
use tracing::warn;

use crate::config::Settings;
use crate::display::{format_rotation, format_rotation_totals};
use crate::error::{RotateError, RotateResult};
use crate::history::{HistoryLogger, RunRecord};
use crate::models::RetentionKind;
use crate::services::{Clock, Rotator};
use crate::transfer::TransferTool;

use super::run::RetentionArgs;

/// Arguments of the `prune` subcommand
#[derive(Args, Debug, Clone)]
pub struct PruneArgs {
    /// Root under which dated backups are kept
    #[arg(long = "backup-destination", value_name = "PATH")]
    pub backup_destination: String,

    #[command(flatten)]
    pub retention: RetentionArgs,

    /// Report which backups would be deleted without deleting them
    #[arg(long)]
    pub dry_run: bool,
}

/// Handle the prune command
///
/// Returns `true` when the listing or any deletion failed.
pub fn handle_prune_command(
    tool: &dyn TransferTool,
    clock: &dyn Clock,
    settings: &Settings,
    history: Option<&HistoryLogger>,
    args: PruneArgs,
) -> RotateResult<bool> {
    if args.backup_destination.trim().is_empty() {
        return Err(RotateError::Validation(
            "--backup-destination must not be empty".into(),
        ));
    }

    let policy = args
        .retention
        .retention_policy
        .unwrap_or(RetentionKind::Age)
        .with_limit(
            args.retention
                .backup_retention
                .unwrap_or(settings.backup_retention),
        );

    let rotator = Rotator::new(tool, &args.backup_destination);
    let result = rotator.rotate(policy, clock.today(), args.dry_run);

    let failed = match &result {
        Ok(rotation) => {
            print!("{}", format_rotation(rotation));
            println!("{}", format_rotation_totals(rotation));
            rotation.failure_count() > 0
        }
        Err(e) => {
            eprintln!("Error during rotation: {}", e);
            true
        }
    };

    if let Some(logger) = history {
        if let Err(e) = logger.log(&RunRecord::prune(&args.backup_destination, &result)) {
            warn!(
                path = %logger.path().display(),
                error = %e,
                "could not record run history"
            );
        }
    }

    Ok(failed)
}
