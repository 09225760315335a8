//! syncrotate - directory sync with rotating dated backups
//!
//! Keeps a local directory in sync with a remote through `rclone`, takes a
//! dated snapshot of the local side on every run, and rotates old snapshots
//! out by age or by count.
//!
//! # Modules
//!
//! - `models`: snapshot ids, retention policies, workflows and run reports
//! - `transfer`: the transfer tool seam and its `rclone` implementation
//! - `services`: snapshot naming, retention and workflow orchestration
//! - `config`: paths, persisted settings and per-run configuration
//! - `history`: the JSONL run history log
//! - `display`: terminal formatting
//! - `cli`: command handlers
//! - `error`: the crate error type
//!
//! # Example
//!
//! ```rust,ignore
//! use syncrotate::config::{RunConfig, RunOverrides, Settings};
//! use syncrotate::models::Workflow;
//! use syncrotate::services::{BackupOrchestrator, SystemClock};
//! use syncrotate::transfer::RcloneTool;
//!
//! let config = RunConfig::resolve(
//!     Workflow::Push,
//!     "/home/me/docs",
//!     "gdrive:docs",
//!     "gdrive:backups",
//!     RunOverrides::default(),
//!     &Settings::default(),
//! )?;
//! let report = BackupOrchestrator::new(&RcloneTool::default(), &SystemClock, &config).run();
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod services;
pub mod transfer;

pub use error::RotateError;
