//! Custom error types for syncrotate
//!
//! This module defines the error hierarchy for the application using thiserror.
//! Transfer, listing and purge failures are recovered at the step boundary by
//! the orchestrator; only configuration problems are fatal.

use thiserror::Error;

/// The main error type for syncrotate operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input that clap could not reject on its own
    #[error("Validation error: {0}")]
    Validation(String),

    /// The transfer tool could not be started at all
    #[error("Failed to launch {program}: {message}")]
    Launch { program: String, message: String },

    /// The transfer tool ran and reported failure
    #[error("{operation} failed ({status}){}", format_stderr(.stderr))]
    Transfer {
        operation: &'static str,
        status: String,
        stderr: String,
    },

    /// Backup directories could not be listed
    #[error("Failed to list backups under {root}: {message}")]
    Listing { root: String, message: String },

    /// A single snapshot could not be deleted
    #[error("Failed to delete backup {snapshot}: {message}")]
    Purge { snapshot: String, message: String },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

impl RotateError {
    /// Create a listing error from the failure of the underlying list call
    pub fn listing(root: impl Into<String>, cause: &RotateError) -> Self {
        Self::Listing {
            root: root.into(),
            message: cause.to_string(),
        }
    }

    /// Create a purge error from the failure of the underlying purge call
    pub fn purge(snapshot: impl Into<String>, cause: &RotateError) -> Self {
        Self::Purge {
            snapshot: snapshot.into(),
            message: cause.to_string(),
        }
    }
}

impl From<std::io::Error> for RotateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RotateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for syncrotate operations
pub type RotateResult<T> = Result<T, RotateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RotateError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_transfer_error_display() {
        let err = RotateError::Transfer {
            operation: "sync",
            status: "exit status: 3".into(),
            stderr: "directory not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "sync failed (exit status: 3): directory not found"
        );
        assert!(matches!(err, RotateError::Transfer { .. }));

        let quiet = RotateError::Transfer {
            operation: "purge",
            status: "exit status: 1".into(),
            stderr: String::new(),
        };
        assert_eq!(quiet.to_string(), "purge failed (exit status: 1)");
    }

    #[test]
    fn test_purge_wraps_cause() {
        let cause = RotateError::Launch {
            program: "rclone".into(),
            message: "No such file or directory".into(),
        };
        let err = RotateError::purge("2024-01-01", &cause);
        assert_eq!(
            err.to_string(),
            "Failed to delete backup 2024-01-01: Failed to launch rclone: No such file or directory"
        );
        assert!(matches!(err, RotateError::Purge { .. }));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RotateError = io_err.into();
        assert!(matches!(err, RotateError::Io(_)));
    }
}
