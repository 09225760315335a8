//! Retention policies for dated backups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of retention a workflow applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RetentionKind {
    /// Keep backups younger than N days
    Age,
    /// Keep the N most recent backups
    Count,
}

impl RetentionKind {
    /// Attach a limit to this kind
    pub fn with_limit(self, limit: u32) -> RetentionPolicy {
        match self {
            RetentionKind::Age => RetentionPolicy::MaxAgeDays(limit),
            RetentionKind::Count => RetentionPolicy::MaxCount(limit),
        }
    }
}

impl fmt::Display for RetentionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionKind::Age => write!(f, "age"),
            RetentionKind::Count => write!(f, "count"),
        }
    }
}

/// Retention policy applied to a backup root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Delete snapshots dated before `today - n days`
    MaxAgeDays(u32),
    /// Keep only the `n` most recent snapshots
    MaxCount(u32),
}

impl RetentionPolicy {
    pub fn kind(&self) -> RetentionKind {
        match self {
            RetentionPolicy::MaxAgeDays(_) => RetentionKind::Age,
            RetentionPolicy::MaxCount(_) => RetentionKind::Count,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            RetentionPolicy::MaxAgeDays(n) | RetentionPolicy::MaxCount(n) => *n,
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::MaxAgeDays(n) => write!(f, "keep {} day(s)", n),
            RetentionPolicy::MaxCount(n) => write!(f, "keep {} backup(s)", n),
        }
    }
}
