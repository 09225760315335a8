//! Transfer tool abstraction
//!
//! `TransferTool` is the only IO boundary of the backup core. Every call
//! returns its outcome as a `RotateResult`; nothing here panics or aborts
//! the caller.
//!
//! - `RcloneTool`: production implementation that runs `rclone` as a subprocess
//! - `MockTransferTool`: test double that records calls and serves scripted results

mod mock;
mod rclone;

pub use mock::{Invocation, MockTransferTool};
pub use rclone::RcloneTool;

use crate::error::RotateResult;
use crate::models::{TransferOp, TransferSpec};

/// Captured output of a directory listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    output: String,
}

impl Listing {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Raw listing lines, produced lazily
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }
}

/// Capability interface over the external transfer tool
pub trait TransferTool {
    /// Run a `Sync`, `Mirror` or `Bisync` transfer
    ///
    /// `first_run` asks a bisync to rebuild its baseline; it is ignored by
    /// one-directional operations.
    fn transfer(&self, op: TransferOp, spec: &TransferSpec, first_run: bool) -> RotateResult<()>;

    /// List the immediate child directories of `root`
    fn list_dirs(&self, root: &str) -> RotateResult<Listing>;

    /// Create `path`, succeeding if it already exists
    fn make_dir(&self, path: &str) -> RotateResult<()>;

    /// Recursively delete `path`
    fn purge(&self, path: &str) -> RotateResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_lines() {
        let listing = Listing::new("a\nb\n\nc");
        assert_eq!(listing.lines().collect::<Vec<_>>(), vec!["a", "b", "", "c"]);
        assert_eq!(Listing::default().lines().count(), 0);
    }
}
