//! Configuration module for syncrotate
//!
//! This module provides:
//! - Config directory resolution
//! - Optional user settings persistence
//! - The resolved, immutable configuration of a single run

pub mod paths;
pub mod run;
pub mod settings;

pub use paths::RotatePaths;
pub use run::{RunConfig, RunOverrides};
pub use settings::Settings;
