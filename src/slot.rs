//! Hour slots and the file names they map to.

use chrono::{DateTime, Duration, Utc};

/// Prefix of every hourly file published by AirNow.
pub const SOURCE_PREFIX: &str = "HourlyData_";

/// Extension shared by source and output files.
pub const EXTENSION: &str = ".dat";

/// Timestamp format embedded in file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A UTC hour expressed as a number of hours before "now".
pub struct HourSlot {
    pub hours_ago: u32,
    pub time: DateTime<Utc>,
}

impl HourSlot {
    pub fn new(now: DateTime<Utc>, hours_ago: u32) -> Self {
        let time = now - Duration::hours(i64::from(hours_ago));

        HourSlot { hours_ago, time }
    }

    /// The source file name, e.g. `HourlyData_2024060118.dat`.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}{}",
            SOURCE_PREFIX,
            self.time.format(FILE_TIMESTAMP_FORMAT),
            EXTENSION
        )
    }
}

// -- Tests -------------------------------------------------------------------
