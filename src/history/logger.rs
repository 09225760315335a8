//! Append-only run history log
//!
//! Each finished run is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{RotateError, RotateResult};

use super::entry::RunRecord;

/// Handles writing run records to the history log file
///
/// The log file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one run.
pub struct HistoryLogger {
    /// Path to the history log file
    log_path: PathBuf,
}

impl HistoryLogger {
    /// Create a new HistoryLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append a record to the history log
    pub fn log(&self, record: &RunRecord) -> RotateResult<()> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RotateError::Io(format!("Failed to create history directory: {}", e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| RotateError::Io(format!("Failed to open history log: {}", e)))?;

        let json = serde_json::to_string(record)
            .map_err(|e| RotateError::Json(format!("Failed to serialize run record: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| RotateError::Io(format!("Failed to write run record: {}", e)))?;

        file.flush()
            .map_err(|e| RotateError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Read all records, oldest first
    pub fn read_all(&self) -> RotateResult<Vec<RunRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| RotateError::Io(format!("Failed to open history log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                RotateError::Io(format!(
                    "Failed to read history log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: RunRecord = serde_json::from_str(&line).map_err(|e| {
                RotateError::Json(format!(
                    "Failed to parse run record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Read the most recent N records, oldest first
    pub fn read_recent(&self, count: usize) -> RotateResult<Vec<RunRecord>> {
        let all_records = self.read_all()?;
        let start = all_records.len().saturating_sub(count);
        Ok(all_records[start..].to_vec())
    }

    /// Get the path to the history log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
