//! Resolved configuration of one workflow run
//!
//! Built once from command-line flags and settings, then handed unchanged to
//! the orchestrator.

use crate::error::{RotateError, RotateResult};
use crate::models::{RetentionKind, RetentionPolicy, Workflow};

use super::settings::Settings;

/// Immutable inputs of one backup workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub workflow: Workflow,
    pub local_dir: String,
    pub remote: String,
    pub backup_root: String,
    pub retention: RetentionPolicy,
    /// Forwarded verbatim to every sync, mirror and bisync call
    pub extra_args: Vec<String>,
    /// Report rotation candidates without deleting them
    pub dry_run: bool,
}

/// Raw flag values before settings are applied
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub retention_kind: Option<RetentionKind>,
    pub retention_limit: Option<u32>,
    pub extra_args: Vec<String>,
    pub dry_run: bool,
}

impl RunConfig {
    /// Merge flags with settings and validate the result
    pub fn resolve(
        workflow: Workflow,
        local_dir: impl Into<String>,
        remote: impl Into<String>,
        backup_root: impl Into<String>,
        overrides: RunOverrides,
        settings: &Settings,
    ) -> RotateResult<Self> {
        let kind = overrides
            .retention_kind
            .unwrap_or(workflow.plan().default_retention);
        let limit = overrides
            .retention_limit
            .unwrap_or(settings.backup_retention);

        let mut extra_args = settings.default_extra_args.clone();
        extra_args.extend(overrides.extra_args);

        let config = Self {
            workflow,
            local_dir: local_dir.into(),
            remote: remote.into(),
            backup_root: backup_root.into(),
            retention: kind.with_limit(limit),
            extra_args,
            dry_run: overrides.dry_run,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot describe a sensible run
    pub fn validate(&self) -> RotateResult<()> {
        for (flag, value) in [
            ("--local-directory", &self.local_dir),
            ("--remote-destination", &self.remote),
            ("--backup-destination", &self.backup_root),
        ] {
            if value.trim().is_empty() {
                return Err(RotateError::Validation(format!("{} must not be empty", flag)));
            }
        }

        if same_location(&self.backup_root, &self.local_dir)
            || same_location(&self.backup_root, &self.remote)
        {
            return Err(RotateError::Validation(
                "--backup-destination must differ from the directories being synced".into(),
            ));
        }

        Ok(())
    }
}

fn same_location(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
