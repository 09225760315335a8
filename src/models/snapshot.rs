//! Snapshot identifiers and listings
//!
//! A snapshot is one dated directory under a backup root, named `YYYY-MM-DD`.
//! Identifiers are parsed into a structured date on the way in and only
//! formatted back to text when a tool path is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RotateError;

const SNAPSHOT_FORMAT: &str = "%Y-%m-%d";

/// Calendar-date label of one backup directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnapshotId(NaiveDate);

impl SnapshotId {
    /// Create a snapshot id for the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a directory name, accepting only zero-padded `YYYY-MM-DD`
    ///
    /// Returns `None` for anything else, including valid-looking but
    /// impossible dates such as `2024-02-30`.
    pub fn parse(name: &str) -> Option<Self> {
        let bytes = name.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !digits_ok {
            return None;
        }
        NaiveDate::parse_from_str(name, SNAPSHOT_FORMAT)
            .ok()
            .map(Self)
    }

    /// Get the underlying date
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SNAPSHOT_FORMAT))
    }
}

impl FromStr for SnapshotId {
    type Err = RotateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            RotateError::Validation(format!("'{}' is not a YYYY-MM-DD snapshot name", s))
        })
    }
}

impl TryFrom<String> for SnapshotId {
    type Error = RotateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SnapshotId> for String {
    fn from(id: SnapshotId) -> Self {
        id.to_string()
    }
}

/// Snapshots found under a backup root, in listing order
///
/// Entries that do not parse as snapshot ids are kept aside in `skipped`
/// so that rotation never counts or deletes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSet {
    snapshots: Vec<SnapshotId>,
    skipped: Vec<String>,
}

impl SnapshotSet {
    /// Build a set from bare directory names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            let name = name.as_ref();
            match SnapshotId::parse(name) {
                Some(id) => set.snapshots.push(id),
                None => set.skipped.push(name.to_string()),
            }
        }
        set
    }

    /// Build a set from raw listing lines of the transfer tool
    ///
    /// `rclone lsd` lines carry four columns (size, date, time, count) before
    /// the directory name, and the name itself may contain spaces. Lines that
    /// do not have that shape are read as a bare path. The directory name is
    /// the final path segment of what remains. Blank lines are ignored.
    pub fn from_listing<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = lines
            .into_iter()
            .filter_map(|line| entry_name(line.as_ref()).map(str::to_string))
            .collect();
        Self::from_names(names)
    }

    /// Valid snapshots in listing order
    pub fn snapshots(&self) -> &[SnapshotId] {
        &self.snapshots
    }

    /// Names that were not valid snapshot ids
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Columns preceding the name in an `rclone lsd` line
const LSD_COLUMNS: usize = 4;

/// Extract the directory name from one listing line
fn entry_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let name = lsd_name(line).unwrap_or(line);
    name.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

/// Everything after the four leading `lsd` columns, if the line has them
fn lsd_name(line: &str) -> Option<&str> {
    let mut columns = Vec::with_capacity(LSD_COLUMNS);
    let mut rest = line;
    for _ in 0..LSD_COLUMNS {
        let (column, tail) = rest.split_once(char::is_whitespace)?;
        columns.push(column);
        rest = tail.trim_start();
    }

    let numeric = |s: &str| s.parse::<i64>().is_ok();
    if !numeric(columns[0]) || !numeric(columns[3]) || rest.is_empty() {
        return None;
    }
    Some(rest)
}
