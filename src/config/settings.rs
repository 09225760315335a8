//! User settings for syncrotate
//!
//! Optional defaults read from `config.json`. Every field has a default, so a
//! missing file or a partial file is fine; command-line flags win over
//! anything stored here.

use serde::{Deserialize, Serialize};

use super::paths::RotatePaths;
use crate::error::RotateError;

/// Retention limit used when neither the CLI nor the settings file gives one
pub const DEFAULT_RETENTION: u32 = 7;

/// User settings for syncrotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Transfer tool executable
    #[serde(default = "default_tool_binary")]
    pub tool_binary: String,

    /// Arguments passed to every transfer before any `--extra-args`
    #[serde(default)]
    pub default_extra_args: Vec<String>,

    /// Retention limit (days or count, depending on the policy)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: u32,

    /// Append a record of every run to the history log
    #[serde(default = "default_record_history")]
    pub record_history: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_tool_binary() -> String {
    "rclone".to_string()
}

fn default_backup_retention() -> u32 {
    DEFAULT_RETENTION
}

fn default_record_history() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            tool_binary: default_tool_binary(),
            default_extra_args: Vec::new(),
            backup_retention: default_backup_retention(),
            record_history: default_record_history(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(paths: &RotatePaths) -> Result<Self, RotateError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| RotateError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents).map_err(|e| {
            RotateError::Config(format!(
                "Failed to parse settings file {}: {}",
                settings_path.display(),
                e
            ))
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RotatePaths) -> Result<(), RotateError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| RotateError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| RotateError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tool_binary, "rclone");
        assert_eq!(settings.backup_retention, 7);
        assert!(settings.default_extra_args.is_empty());
        assert!(settings.record_history);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_default(&paths).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            tool_binary: "/opt/rclone/bin/rclone".into(),
            default_extra_args: vec!["--fast-list".into()],
            backup_retention: 14,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{ "backup_retention": 3 }"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.backup_retention, 3);
        assert_eq!(loaded.tool_binary, "rclone");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RotatePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        let err = Settings::load_or_default(&paths).unwrap_err();
        assert!(matches!(err, RotateError::Config(_)));
    }
}
