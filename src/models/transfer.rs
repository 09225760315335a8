//! Transfer tool operations
//!
//! Describes a single invocation of the external transfer tool without
//! knowing how it is executed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation kinds understood by the transfer tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferOp {
    /// One-directional copy, never deletes at the destination
    Sync,
    /// One-directional overwrite, destination made identical to source
    Mirror,
    /// Bidirectional sync between two paths
    Bisync,
    /// List immediate child directories
    ListDirs,
    /// Create a directory, succeeding if it already exists
    MakeDir,
    /// Recursively remove a directory
    Purge,
}

impl TransferOp {
    /// The rclone verb for this operation
    pub fn verb(&self) -> &'static str {
        match self {
            TransferOp::Sync => "copy",
            TransferOp::Mirror => "sync",
            TransferOp::Bisync => "bisync",
            TransferOp::ListDirs => "lsd",
            TransferOp::MakeDir => "mkdir",
            TransferOp::Purge => "purge",
        }
    }

    /// Short name used in status lines and errors
    pub fn name(&self) -> &'static str {
        match self {
            TransferOp::Sync => "sync",
            TransferOp::Mirror => "mirror",
            TransferOp::Bisync => "bisync",
            TransferOp::ListDirs => "list",
            TransferOp::MakeDir => "mkdir",
            TransferOp::Purge => "purge",
        }
    }

    /// Whether caller-supplied extra arguments apply to this operation
    pub fn takes_extra_args(&self) -> bool {
        matches!(
            self,
            TransferOp::Sync | TransferOp::Mirror | TransferOp::Bisync
        )
    }
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Source, destination and pass-through arguments of one transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSpec {
    /// Source path (or path A for bisync)
    pub source: String,
    /// Destination path (or path B for bisync)
    pub destination: String,
    /// Opaque arguments appended verbatim
    pub extra_args: Vec<String>,
}

impl TransferSpec {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        extra_args: Vec<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            extra_args,
        }
    }
}

/// Join a child name onto a local or remote root
///
/// Remote roots are not filesystem paths, so this joins with `/` and
/// handles bare remotes (`gdrive:`) by appending directly.
pub fn join_remote(root: &str, name: &str) -> String {
    let trimmed = root.trim_end_matches('/');
    if trimmed.is_empty() {
        if root.is_empty() {
            return name.to_string();
        }
        return format!("/{}", name);
    }
    if trimmed.ends_with(':') {
        format!("{}{}", trimmed, name)
    } else {
        format!("{}/{}", trimmed, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs() {
        assert_eq!(TransferOp::Sync.verb(), "copy");
        assert_eq!(TransferOp::Mirror.verb(), "sync");
        assert_eq!(TransferOp::ListDirs.verb(), "lsd");
        assert_eq!(TransferOp::Purge.to_string(), "purge");
    }

    #[test]
    fn test_extra_args_only_for_transfers() {
        assert!(TransferOp::Bisync.takes_extra_args());
        assert!(TransferOp::Mirror.takes_extra_args());
        assert!(!TransferOp::ListDirs.takes_extra_args());
        assert!(!TransferOp::MakeDir.takes_extra_args());
        assert!(!TransferOp::Purge.takes_extra_args());
    }

    #[test]
    fn test_join_remote() {
        assert_eq!(join_remote("gdrive:backups", "2024-01-01"), "gdrive:backups/2024-01-01");
        assert_eq!(join_remote("gdrive:backups/", "2024-01-01"), "gdrive:backups/2024-01-01");
        assert_eq!(join_remote("gdrive:", "2024-01-01"), "gdrive:2024-01-01");
        assert_eq!(join_remote("/mnt/backup", "2024-01-01"), "/mnt/backup/2024-01-01");
        assert_eq!(join_remote("/", "2024-01-01"), "/2024-01-01");
        assert_eq!(join_remote("", "2024-01-01"), "2024-01-01");
    }
}
