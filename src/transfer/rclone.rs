//! rclone-backed transfer tool
//!
//! Each operation spawns one blocking `rclone` process. Transfers stream their
//! standard output to the terminal; listings capture it. Standard error is
//! relayed to the terminal line by line while the last few lines are kept,
//! so that a failure can carry the tool's own message.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{ChildStderr, Command, Stdio};
use std::thread;

use tracing::debug;

use super::{Listing, TransferTool};
use crate::error::{RotateError, RotateResult};
use crate::models::{TransferOp, TransferSpec};

/// Flag that makes `rclone bisync` rebuild its baseline
pub const RESYNC_FLAG: &str = "--resync";

/// Maximum number of stderr lines kept in an error
const STDERR_TAIL_LINES: usize = 20;

/// Production transfer tool
#[derive(Debug, Clone)]
pub struct RcloneTool {
    binary: String,
}

impl RcloneTool {
    /// Create a tool that runs the given executable
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Build the argument vector for a transfer
    pub fn transfer_args(op: TransferOp, spec: &TransferSpec, first_run: bool) -> Vec<String> {
        let mut args = vec![
            op.verb().to_string(),
            spec.source.clone(),
            spec.destination.clone(),
        ];
        if op == TransferOp::Bisync && first_run {
            args.push(RESYNC_FLAG.to_string());
        }
        if op.takes_extra_args() {
            args.extend(spec.extra_args.iter().cloned());
        }
        args
    }

    fn run(&self, op: TransferOp, args: &[String], capture_stdout: bool) -> RotateResult<String> {
        debug!(program = %self.binary, ?args, "invoking transfer tool");

        let mut command = Command::new(&self.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .stdout(if capture_stdout {
                Stdio::piped()
            } else {
                Stdio::inherit()
            });

        let mut child = command.spawn().map_err(|e| RotateError::Launch {
            program: self.binary.clone(),
            message: e.to_string(),
        })?;

        let stderr = child.stderr.take();
        let relay = thread::spawn(move || stderr.map(relay_stderr).unwrap_or_default());

        let mut stdout = Vec::new();
        let read = match child.stdout.take() {
            Some(mut pipe) => pipe.read_to_end(&mut stdout).map(|_| ()),
            None => Ok(()),
        };
        let status = child.wait();
        let tail = relay.join().unwrap_or_default();

        read.map_err(|e| RotateError::Io(format!("Failed to read {} output: {}", op, e)))?;
        let status =
            status.map_err(|e| RotateError::Io(format!("Failed to wait for {}: {}", op, e)))?;

        if status.success() {
            Ok(String::from_utf8_lossy(&stdout).into_owned())
        } else {
            Err(RotateError::Transfer {
                operation: op.name(),
                status: status.to_string(),
                stderr: tail,
            })
        }
    }
}

impl Default for RcloneTool {
    fn default() -> Self {
        Self::new("rclone")
    }
}

impl TransferTool for RcloneTool {
    fn transfer(&self, op: TransferOp, spec: &TransferSpec, first_run: bool) -> RotateResult<()> {
        if !op.takes_extra_args() {
            return Err(RotateError::Validation(format!(
                "{} is not a transfer operation",
                op
            )));
        }
        let args = Self::transfer_args(op, spec, first_run);
        self.run(op, &args, false).map(|_| ())
    }

    fn list_dirs(&self, root: &str) -> RotateResult<Listing> {
        let op = TransferOp::ListDirs;
        let args = vec![op.verb().to_string(), root.to_string()];
        self.run(op, &args, true).map(Listing::new)
    }

    fn make_dir(&self, path: &str) -> RotateResult<()> {
        let op = TransferOp::MakeDir;
        let args = vec![op.verb().to_string(), path.to_string()];
        self.run(op, &args, false).map(|_| ())
    }

    fn purge(&self, path: &str) -> RotateResult<()> {
        let op = TransferOp::Purge;
        let args = vec![op.verb().to_string(), path.to_string()];
        self.run(op, &args, false).map(|_| ())
    }
}

/// Bounded buffer of the last non-empty stderr lines
#[derive(Debug, Default)]
struct StderrTail {
    lines: VecDeque<String>,
}

impl StderrTail {
    fn push(&mut self, line: &str) {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return;
        }
        if self.lines.len() == STDERR_TAIL_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    fn finish(self) -> String {
        Vec::from(self.lines).join("\n")
    }
}

/// Copy the tool's stderr to ours as it arrives, returning its tail
fn relay_stderr(stderr: ChildStderr) -> String {
    let mut reader = BufReader::new(stderr);
    let mut tail = StderrTail::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let _ = io::stderr().write_all(line.as_bytes());
                tail.push(&line);
            }
        }
    }

    tail.finish()
}
