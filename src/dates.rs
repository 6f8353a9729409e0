//! Relative dates and timestamps for seed records.
//!
//! Everything is computed from one captured "now" so a run never straddles
//! midnight halfway through.

use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};

/// Format of plan dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fixed point in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: NaiveDateTime,
}

impl Clock {
    /// Capture the current local time.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Use a fixed time.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Today's date as `YYYY-MM-DD`.
    pub fn today(&self) -> String {
        self.days_ago(0)
    }

    pub fn yesterday(&self) -> String {
        self.days_ago(1)
    }

    pub fn two_days_ago(&self) -> String {
        self.days_ago(2)
    }

    /// Calendar date `days` before today as `YYYY-MM-DD`.
    pub fn days_ago(&self, days: i64) -> String {
        (self.now.date() - TimeDelta::days(days))
            .format(DATE_FORMAT)
            .to_string()
    }

    /// Timestamp `minutes` before now, ISO-8601 without offset.
    pub fn minutes_ago(&self, minutes: i64) -> String {
        iso_timestamp(self.now - TimeDelta::minutes(minutes))
    }
}

/// Format a naive timestamp as ISO-8601.
///
/// Microseconds are included only when non-zero.
pub fn iso_timestamp(at: NaiveDateTime) -> String {
    if at.nanosecond() / 1_000 == 0 {
        at.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
