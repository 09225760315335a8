//! Mock transfer tool for testing.
//!
//! Records every call and serves pre-configured listings and failures, making
//! it possible to test orchestration and rotation without spawning processes.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Listing, TransferTool};
use crate::error::{RotateError, RotateResult};
use crate::models::{TransferOp, TransferSpec};

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub op: TransferOp,
    /// Source path, or the single path of list/mkdir/purge
    pub source: String,
    pub destination: Option<String>,
    pub extra_args: Vec<String>,
    pub first_run: bool,
}

/// Test double that records calls and returns scripted results
#[derive(Debug, Default)]
pub struct MockTransferTool {
    invocations: RefCell<Vec<Invocation>>,
    listings: HashMap<String, String>,
    failures: Vec<(TransferOp, String)>,
}

impl MockTransferTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `output` when `root` is listed
    pub fn with_listing(mut self, root: &str, output: &str) -> Self {
        self.listings.insert(root.to_string(), output.to_string());
        self
    }

    /// Fail every `op` call that touches `path` (as source, destination or target)
    pub fn failing(mut self, op: TransferOp, path: &str) -> Self {
        self.failures.push((op, path.to_string()));
        self
    }

    /// All calls in the order they were made
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Operation kinds in call order
    pub fn ops(&self) -> Vec<TransferOp> {
        self.invocations.borrow().iter().map(|i| i.op).collect()
    }

    /// Paths passed to `purge`, in call order
    pub fn purged(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .filter(|i| i.op == TransferOp::Purge)
            .map(|i| i.source.clone())
            .collect()
    }

    fn record(&self, invocation: Invocation) -> RotateResult<()> {
        let failed = self.failures.iter().any(|(op, path)| {
            *op == invocation.op
                && (invocation.source == *path
                    || invocation.destination.as_deref() == Some(path.as_str()))
        });
        let op = invocation.op;
        self.invocations.borrow_mut().push(invocation);
        if failed {
            Err(RotateError::Transfer {
                operation: op.name(),
                status: "exit status: 1".to_string(),
                stderr: format!("mock: scripted {} failure", op),
            })
        } else {
            Ok(())
        }
    }

    fn record_path(&self, op: TransferOp, path: &str) -> RotateResult<()> {
        self.record(Invocation {
            op,
            source: path.to_string(),
            destination: None,
            extra_args: Vec::new(),
            first_run: false,
        })
    }
}

impl TransferTool for MockTransferTool {
    fn transfer(&self, op: TransferOp, spec: &TransferSpec, first_run: bool) -> RotateResult<()> {
        self.record(Invocation {
            op,
            source: spec.source.clone(),
            destination: Some(spec.destination.clone()),
            extra_args: spec.extra_args.clone(),
            first_run,
        })
    }

    fn list_dirs(&self, root: &str) -> RotateResult<Listing> {
        self.record_path(TransferOp::ListDirs, root)?;
        Ok(Listing::new(
            self.listings.get(root).cloned().unwrap_or_default(),
        ))
    }

    fn make_dir(&self, path: &str) -> RotateResult<()> {
        self.record_path(TransferOp::MakeDir, path)
    }

    fn purge(&self, path: &str) -> RotateResult<()> {
        self.record_path(TransferOp::Purge, path)
    }
}
