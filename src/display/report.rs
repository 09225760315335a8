//! Run report formatting for terminal output
//!
//! Formats per-step status lines as steps finish, and the summary block
//! printed at the end of a run.

use crate::history::RunRecord;
use crate::models::{RotationReport, Step, StepReport, StepStatus, WorkflowReport};

/// Format the status line(s) of a finished step
pub fn format_step(step: &StepReport, rotation: Option<&RotationReport>) -> String {
    let mut output = String::new();

    if let Some(rotation) = rotation {
        output.push_str(&format_rotation(rotation));
    }

    match &step.status {
        StepStatus::Succeeded => output.push_str(&format!("{} completed successfully!", step.step)),
        StepStatus::Failed { message } => {
            output.push_str(&format!("Error during {}: {}", step_verb(step.step), message))
        }
    }

    output
}

fn step_verb(step: Step) -> &'static str {
    match step {
        Step::Sync => "sync",
        Step::Backup => "backup",
        Step::Rotate => "rotation",
    }
}

/// Format one line per selected snapshot
pub fn format_rotation(rotation: &RotationReport) -> String {
    let mut output = String::new();

    if rotation.dry_run {
        for snapshot in &rotation.selected {
            output.push_str(&format!("Would delete backup directory: {}\n", snapshot));
        }
        return output;
    }

    for purge in &rotation.purges {
        match &purge.error {
            None => output.push_str(&format!("Deleted backup directory: {}\n", purge.snapshot)),
            Some(error) => output.push_str(&format!("{}\n", error)),
        }
    }

    output
}

/// Format the end-of-run summary
pub fn format_summary(report: &WorkflowReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Workflow: {} (snapshot {})\n",
        report.workflow, report.snapshot
    ));
    output.push_str(&format!("{:-<40}\n", ""));

    for step in &report.steps {
        let status = match &step.status {
            StepStatus::Succeeded => "ok",
            StepStatus::Failed { .. } => "FAILED",
        };
        output.push_str(&format!("  {:<10} {}\n", step.step.to_string(), status));
    }

    if let Some(rotation) = &report.rotation {
        output.push_str(&format!("\n{}\n", format_rotation_totals(rotation)));
    }

    output
}

/// One-line totals of a rotation pass
pub fn format_rotation_totals(rotation: &RotationReport) -> String {
    let mut line = format!(
        "Retention: {}; {} backup(s) found, {} selected",
        rotation.policy,
        rotation.found,
        rotation.selected.len()
    );

    if rotation.dry_run {
        line.push_str(" (dry run, nothing deleted)");
    } else {
        line.push_str(&format!(", {} deleted", rotation.deleted().count()));
        let failures = rotation.failure_count();
        if failures > 0 {
            line.push_str(&format!(", {} failed", failures));
        }
    }

    if !rotation.skipped.is_empty() {
        line.push_str(&format!("; ignored: {}", rotation.skipped.join(", ")));
    }

    line
}

/// Format run history, oldest first
pub fn format_history(records: &[RunRecord]) -> String {
    if records.is_empty() {
        return "No runs recorded.".to_string();
    }

    records
        .iter()
        .map(RunRecord::format_human_readable)
        .collect::<Vec<_>>()
        .join("\n")
}
