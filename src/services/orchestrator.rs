//! Backup orchestrator
//!
//! Runs the sync, backup and rotation steps of one workflow in a fixed order.
//! Steps are best-effort: a failing step is reported and the next step runs
//! anyway. Nothing is retried or rolled back.

use tracing::{info, warn};

use crate::config::RunConfig;
use crate::models::{
    join_remote, RotationReport, SnapshotId, Step, StepReport, SyncPosition, TransferSpec,
    WorkflowPlan, WorkflowReport,
};
use crate::transfer::TransferTool;

use super::namer::{snapshot_for, Clock};
use super::retention::Rotator;

/// Drives one workflow against a transfer tool
pub struct BackupOrchestrator<'a> {
    tool: &'a dyn TransferTool,
    clock: &'a dyn Clock,
    config: &'a RunConfig,
}

impl<'a> BackupOrchestrator<'a> {
    pub fn new(tool: &'a dyn TransferTool, clock: &'a dyn Clock, config: &'a RunConfig) -> Self {
        Self {
            tool,
            clock,
            config,
        }
    }

    /// Run every step and return the combined report
    pub fn run(&self) -> WorkflowReport {
        self.run_observed(|_, _| {})
    }

    /// Run every step, calling `observer` as soon as each step finishes
    pub fn run_observed<F>(&self, mut observer: F) -> WorkflowReport
    where
        F: FnMut(&StepReport, Option<&RotationReport>),
    {
        let plan = self.config.workflow.plan();
        let snapshot = snapshot_for(self.clock);
        let mut report = WorkflowReport::new(self.config.workflow, snapshot);

        info!(
            workflow = %self.config.workflow,
            snapshot = %snapshot,
            retention = %self.config.retention,
            "starting workflow"
        );

        let order: &[Step] = match plan.sync_position {
            SyncPosition::First => &[Step::Sync, Step::Backup, Step::Rotate],
            SyncPosition::Last => &[Step::Backup, Step::Rotate, Step::Sync],
        };

        for step in order {
            let step_report = match step {
                Step::Sync => self.sync(&plan),
                Step::Backup => self.backup(&plan, snapshot),
                Step::Rotate => {
                    let (step_report, rotation) = self.rotate(snapshot);
                    report.rotation = rotation;
                    step_report
                }
            };
            if let Some(message) = step_report.status.message() {
                warn!(step = %step_report.step, error = %message, "step failed");
            }
            observer(&step_report, report.rotation.as_ref().filter(|_| *step == Step::Rotate));
            report.steps.push(step_report);
        }

        report
    }

    fn sync(&self, plan: &WorkflowPlan) -> StepReport {
        let (source, destination) = plan
            .sync_orientation
            .arrange(self.config.local_dir.clone(), self.config.remote.clone());
        let spec = TransferSpec::new(source, destination, self.config.extra_args.clone());

        match self.tool.transfer(plan.sync_op, &spec, false) {
            Ok(()) => StepReport::succeeded(Step::Sync),
            Err(e) => StepReport::failed(Step::Sync, e.to_string()),
        }
    }

    fn backup(&self, plan: &WorkflowPlan, snapshot: SnapshotId) -> StepReport {
        let snapshot_dir = join_remote(&self.config.backup_root, &snapshot.to_string());

        if let Err(e) = self.tool.make_dir(&snapshot_dir) {
            return StepReport::failed(
                Step::Backup,
                format!("could not create {}: {}", snapshot_dir, e),
            );
        }

        let (source, destination) = plan
            .backup_orientation
            .arrange(self.config.local_dir.clone(), snapshot_dir);
        let spec = TransferSpec::new(source, destination, self.config.extra_args.clone());

        match self.tool.transfer(plan.backup_op, &spec, plan.backup_resync) {
            Ok(()) => StepReport::succeeded(Step::Backup),
            Err(e) => StepReport::failed(Step::Backup, e.to_string()),
        }
    }

    fn rotate(&self, snapshot: SnapshotId) -> (StepReport, Option<RotationReport>) {
        let rotator = Rotator::new(self.tool, &self.config.backup_root);

        match rotator.rotate(self.config.retention, snapshot.date(), self.config.dry_run) {
            Ok(rotation) => {
                let failures = rotation.failure_count();
                let step_report = if failures == 0 {
                    StepReport::succeeded(Step::Rotate)
                } else {
                    StepReport::failed(
                        Step::Rotate,
                        format!(
                            "{} of {} deletion(s) failed",
                            failures,
                            rotation.purges.len()
                        ),
                    )
                };
                (step_report, Some(rotation))
            }
            Err(e) => (StepReport::failed(Step::Rotate, e.to_string()), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::config::{RunOverrides, Settings};
    use crate::models::{RetentionPolicy, TransferOp, Workflow};
    use crate::services::namer::FixedClock;
    use crate::transfer::{Invocation, MockTransferTool};

    const LOCAL: &str = "/home/me/docs";
    const REMOTE: &str = "gdrive:docs";
    const BACKUPS: &str = "gdrive:backups";
    const TODAY_DIR: &str = "gdrive:backups/2024-01-10";

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    fn config(workflow: Workflow) -> RunConfig {
        RunConfig::resolve(
            workflow,
            LOCAL,
            REMOTE,
            BACKUPS,
            RunOverrides {
                extra_args: vec!["--exclude".into(), "*.tmp".into()],
                ..RunOverrides::default()
            },
            &Settings::default(),
        )
        .unwrap()
    }

    fn listing() -> String {
        ["2023-12-01", "2024-01-01", "2024-01-05", "2024-01-09", "scratch"]
            .iter()
            .map(|n| format!("          -1 2024-01-09 08:00:00        -1 {}\n", n))
            .collect()
    }

    fn transfer(op: TransferOp, source: &str, destination: &str, first_run: bool) -> Invocation {
        Invocation {
            op,
            source: source.to_string(),
            destination: Some(destination.to_string()),
            extra_args: vec!["--exclude".into(), "*.tmp".into()],
            first_run,
        }
    }

    fn path_op(op: TransferOp, path: &str) -> Invocation {
        Invocation {
            op,
            source: path.to_string(),
            destination: None,
            extra_args: Vec::new(),
            first_run: false,
        }
    }

    #[test]
    fn test_bisync_workflow_sequence() {
        let tool = MockTransferTool::new().with_listing(BACKUPS, &listing());
        let config = config(Workflow::Bisync);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(
            tool.invocations(),
            vec![
                transfer(TransferOp::Bisync, REMOTE, LOCAL, false),
                path_op(TransferOp::MakeDir, TODAY_DIR),
                transfer(TransferOp::Bisync, TODAY_DIR, LOCAL, true),
                path_op(TransferOp::ListDirs, BACKUPS),
                path_op(TransferOp::Purge, "gdrive:backups/2023-12-01"),
                path_op(TransferOp::Purge, "gdrive:backups/2024-01-01"),
            ]
        );
        assert!(!report.has_failures());
        assert_eq!(report.snapshot.to_string(), "2024-01-10");
        let rotation = report.rotation.unwrap();
        assert_eq!(rotation.policy, RetentionPolicy::MaxAgeDays(7));
        assert_eq!(rotation.skipped, vec!["scratch".to_string()]);
    }

    #[test]
    fn test_mirror_workflow_sequence() {
        let tool = MockTransferTool::new();
        let config = config(Workflow::Mirror);
        BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(
            tool.invocations(),
            vec![
                transfer(TransferOp::Mirror, LOCAL, REMOTE, false),
                path_op(TransferOp::MakeDir, TODAY_DIR),
                transfer(TransferOp::Mirror, LOCAL, TODAY_DIR, false),
                path_op(TransferOp::ListDirs, BACKUPS),
            ]
        );
    }

    #[test]
    fn test_push_workflow_uses_one_directional_sync() {
        let tool = MockTransferTool::new();
        let config = config(Workflow::Push);
        BackupOrchestrator::new(&tool, &clock(), &config).run();

        let invocations = tool.invocations();
        assert_eq!(invocations[0], transfer(TransferOp::Sync, LOCAL, REMOTE, false));
        assert_eq!(invocations[2], transfer(TransferOp::Sync, LOCAL, TODAY_DIR, false));
    }

    #[test]
    fn test_pull_workflow_backs_up_and_rotates_before_download() {
        let tool = MockTransferTool::new().with_listing(BACKUPS, &listing());
        let mut config = config(Workflow::Pull);
        config.retention = RetentionPolicy::MaxCount(2);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(
            tool.invocations(),
            vec![
                path_op(TransferOp::MakeDir, TODAY_DIR),
                transfer(TransferOp::Mirror, LOCAL, TODAY_DIR, false),
                path_op(TransferOp::ListDirs, BACKUPS),
                path_op(TransferOp::Purge, "gdrive:backups/2023-12-01"),
                path_op(TransferOp::Purge, "gdrive:backups/2024-01-01"),
                transfer(TransferOp::Mirror, REMOTE, LOCAL, false),
            ]
        );
        let steps: Vec<Step> = report.steps.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![Step::Backup, Step::Rotate, Step::Sync]);
    }

    #[test]
    fn test_sync_failure_does_not_stop_backup_or_rotation() {
        let tool = MockTransferTool::new()
            .with_listing(BACKUPS, &listing())
            .failing(TransferOp::Mirror, REMOTE);
        let config = config(Workflow::Mirror);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(report.failed_steps(), vec![Step::Sync]);
        assert_eq!(
            tool.ops(),
            vec![
                TransferOp::Mirror,
                TransferOp::MakeDir,
                TransferOp::Mirror,
                TransferOp::ListDirs,
                TransferOp::Purge,
                TransferOp::Purge,
            ]
        );
    }

    #[test]
    fn test_failed_mkdir_skips_backup_transfer_but_still_rotates() {
        let tool = MockTransferTool::new().failing(TransferOp::MakeDir, TODAY_DIR);
        let config = config(Workflow::Bisync);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(report.failed_steps(), vec![Step::Backup]);
        let message = report.step(Step::Backup).unwrap().status.message().unwrap();
        assert!(message.contains("could not create gdrive:backups/2024-01-10"));
        assert_eq!(
            tool.ops(),
            vec![TransferOp::Bisync, TransferOp::MakeDir, TransferOp::ListDirs]
        );
    }

    #[test]
    fn test_purge_failures_reported_per_snapshot() {
        let tool = MockTransferTool::new()
            .with_listing(BACKUPS, &listing())
            .failing(TransferOp::Purge, "gdrive:backups/2023-12-01");
        let mut config = config(Workflow::Push);
        config.retention = RetentionPolicy::MaxCount(1);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(tool.purged().len(), 3);
        let rotate = report.step(Step::Rotate).unwrap();
        assert_eq!(rotate.status.message(), Some("1 of 3 deletion(s) failed"));
        assert_eq!(report.rotation.unwrap().deleted().count(), 2);
    }

    #[test]
    fn test_listing_failure_fails_rotation_only() {
        let tool = MockTransferTool::new().failing(TransferOp::ListDirs, BACKUPS);
        let config = config(Workflow::Pull);
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert_eq!(report.failed_steps(), vec![Step::Rotate]);
        assert!(report.rotation.is_none());
        assert!(tool.purged().is_empty());
        assert_eq!(tool.ops().last(), Some(&TransferOp::Mirror));
    }

    #[test]
    fn test_dry_run_skips_purges_only() {
        let tool = MockTransferTool::new().with_listing(BACKUPS, &listing());
        let mut config = config(Workflow::Push);
        config.dry_run = true;
        let report = BackupOrchestrator::new(&tool, &clock(), &config).run();

        assert!(tool.purged().is_empty());
        assert_eq!(report.rotation.unwrap().selected.len(), 2);
        assert_eq!(tool.ops().len(), 4);
    }

    #[test]
    fn test_observer_sees_each_step_in_order() {
        let tool = MockTransferTool::new().with_listing(BACKUPS, &listing());
        let config = config(Workflow::Pull);
        let mut seen = Vec::new();
        BackupOrchestrator::new(&tool, &clock(), &config).run_observed(|step, rotation| {
            seen.push((step.step, rotation.is_some()));
        });

        assert_eq!(
            seen,
            vec![(Step::Backup, false), (Step::Rotate, true), (Step::Sync, false)]
        );
    }
}
