//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod history;
pub mod prune;
pub mod run;

pub use history::handle_history_command;
pub use prune::{handle_prune_command, PruneArgs};
pub use run::{handle_workflow_command, RetentionArgs, WorkflowArgs};
