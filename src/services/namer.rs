//! Snapshot naming
//!
//! Derives the snapshot identifier of "today's" backup. The clock is
//! injectable so runs and tests can pin the calendar date.

use chrono::{Local, NaiveDate};

use crate::models::SnapshotId;

/// Source of the current calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local-timezone wall clock of the invoking process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Snapshot id for the current date of `clock`
pub fn snapshot_for(clock: &dyn Clock) -> SnapshotId {
    SnapshotId::from_date(clock.today())
}

/// Snapshot id for today in the local timezone
pub fn today() -> SnapshotId {
    snapshot_for(&SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(snapshot_for(&clock).to_string(), "2024-01-10");
    }

    #[test]
    fn test_system_clock_matches_local_date() {
        let before = Local::now().date_naive();
        let day = SystemClock.today();
        let after = Local::now().date_naive();
        assert!(day == before || day == after);
    }

    #[test]
    fn test_today_is_formatted_as_date() {
        let name = today().to_string();
        assert_eq!(name.len(), 10);
        assert!(SnapshotId::parse(&name).is_some());
    }
}
