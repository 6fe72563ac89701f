//! A single pipe-delimited row of an AirNow hourly file.
//!
//! Rows look like
//! `06/01/24|18:00|180190008|Charlestown SP|-5|OZONE|PPB|41|Indiana Dept. of Env. Mgt`:
//! a `MM/dd/yy|HH:mm` prefix, then the AQS site id whose first five digits are
//! the state and county FIPS code.

pub const DELIMITER: char = '|';

/// Clark and Floyd counties, Indiana.
pub const COUNTIES: [&str; 2] = ["18019", "18043"];

/// Length of the `MM/dd/yy|HH:mm` prefix.
pub const TIMESTAMP_LEN: usize = 14;

const FIPS_LEN: usize = 5;
const SITE_FIELD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub fips: &'a str,
    /// Everything after the timestamp prefix, leading delimiter included.
    pub payload: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Returns `None` for rows too short to carry a site id and timestamp.
    pub fn from_line(line: &'a str) -> Option<Self> {
        let site = line.split(DELIMITER).nth(SITE_FIELD)?;
        let fips = site.get(..FIPS_LEN)?;
        let payload = line.get(TIMESTAMP_LEN..)?;

        Some(RawRecord { fips, payload })
    }

    pub fn is_southern_indiana(&self) -> bool {
        COUNTIES.contains(&self.fips)
    }

    /// The row with its timestamp prefix replaced by `timestamp`.
    pub fn with_timestamp(&self, timestamp: &str) -> String {
        format!("{}{}", timestamp, self.payload)
    }
}

// -- Tests ----------------------------------------------------------------------------
