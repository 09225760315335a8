//! Retention policy engine
//!
//! Decides which dated backups fall outside a retention policy and deletes
//! them through the transfer tool, one snapshot at a time.

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{RotateError, RotateResult};
use crate::models::{
    join_remote, PurgeOutcome, RetentionPolicy, RotationReport, SnapshotId, SnapshotSet,
};
use crate::transfer::TransferTool;

/// Select the snapshots a policy would delete, oldest first
///
/// - `MaxAgeDays(n)`: every snapshot dated strictly before `today - n days`
/// - `MaxCount(n)`: all but the `n` most recent snapshots
///
/// Entries that were not valid snapshot names never reach this function.
/// Snapshots sharing a date keep their listing order.
pub fn select_for_deletion(
    snapshots: &SnapshotSet,
    policy: RetentionPolicy,
    today: NaiveDate,
) -> Vec<SnapshotId> {
    let mut ordered = snapshots.snapshots().to_vec();
    ordered.sort();

    match policy {
        RetentionPolicy::MaxAgeDays(days) => match cutoff(today, days) {
            Some(cutoff) => ordered
                .into_iter()
                .filter(|s| s.date() < cutoff)
                .collect(),
            None => Vec::new(),
        },
        RetentionPolicy::MaxCount(keep) => {
            let excess = ordered.len().saturating_sub(keep as usize);
            ordered.truncate(excess);
            ordered
        }
    }
}

/// First date that is still retained under an age policy
pub fn cutoff(today: NaiveDate, days: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(days)))
}

/// Applies a retention policy to one backup root
pub struct Rotator<'a> {
    tool: &'a dyn TransferTool,
    backup_root: &'a str,
}

impl<'a> Rotator<'a> {
    pub fn new(tool: &'a dyn TransferTool, backup_root: &'a str) -> Self {
        Self { tool, backup_root }
    }

    /// List the backup root and parse its snapshots
    pub fn snapshots(&self) -> RotateResult<SnapshotSet> {
        let listing = self
            .tool
            .list_dirs(self.backup_root)
            .map_err(|e| RotateError::listing(self.backup_root, &e))?;
        let set = SnapshotSet::from_listing(listing.lines());
        for name in set.skipped() {
            debug!(root = self.backup_root, name = %name, "ignoring non-snapshot directory");
        }
        Ok(set)
    }

    /// Enforce `policy`, purging every selected snapshot
    ///
    /// Fails only when the backup root cannot be listed; in that case nothing
    /// is deleted. Individual purge failures are recorded in the report and do
    /// not stop the remaining purges. With `dry_run` the selection is reported
    /// but no purge is issued.
    pub fn rotate(
        &self,
        policy: RetentionPolicy,
        today: NaiveDate,
        dry_run: bool,
    ) -> RotateResult<RotationReport> {
        let set = self.snapshots()?;
        let selected = select_for_deletion(&set, policy, today);
        info!(
            root = self.backup_root,
            found = set.len(),
            selected = selected.len(),
            %policy,
            "applying retention"
        );

        let mut purges = Vec::new();
        if !dry_run {
            for snapshot in &selected {
                purges.push(self.purge(*snapshot));
            }
        }

        Ok(RotationReport {
            policy,
            found: set.len(),
            skipped: set.skipped().to_vec(),
            selected,
            purges,
            dry_run,
        })
    }

    fn purge(&self, snapshot: SnapshotId) -> PurgeOutcome {
        let path = join_remote(self.backup_root, &snapshot.to_string());
        match self.tool.purge(&path) {
            Ok(()) => {
                info!(path = %path, "deleted backup");
                PurgeOutcome {
                    snapshot,
                    error: None,
                }
            }
            Err(e) => {
                let err = RotateError::purge(snapshot.to_string(), &e);
                warn!(path = %path, error = %e, "failed to delete backup");
                PurgeOutcome {
                    snapshot,
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
