//! Path management for syncrotate
//!
//! ## Path Resolution Order
//!
//! 1. `SYNCROTATE_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`
//!    (`~/.config/syncrotate` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::RotateError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "SYNCROTATE_CONFIG_DIR";

/// Manages all paths used by syncrotate
#[derive(Debug, Clone)]
pub struct RotatePaths {
    /// Base directory for settings and run history
    base_dir: PathBuf,
}

impl RotatePaths {
    /// Create a new RotatePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is unset.
    pub fn new() -> Result<Self, RotateError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create RotatePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the run history log
    pub fn history_log(&self) -> PathBuf {
        self.base_dir.join("runs.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), RotateError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            RotateError::Io(format!("Failed to create config directory: {}", e))
        })
    }
}

fn resolve_default_path() -> Result<PathBuf, RotateError> {
    ProjectDirs::from("", "", "syncrotate")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| RotateError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.history_log(), temp_dir.path().join("runs.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().join("nested").join("conf"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().is_dir());
    }
}
