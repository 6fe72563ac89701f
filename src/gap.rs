//! Finds how far back the download folder has a hole in its hourly files.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Datelike, Offset, TimeZone, Utc};
use log::debug;
use thiserror::Error;

use crate::slot::HourSlot;

#[derive(Debug, Error)]
pub enum GapError {
    #[error("could not check for `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns 1 when daylight saving time is in effect at `now`, else 0.
///
/// The zone's standard offset is taken as the smaller of its offsets on
/// 1 January and 1 July of the same year.
pub fn start_offset<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let standard = [1, 7]
        .into_iter()
        .filter_map(|month| tz.with_ymd_and_hms(now.year(), month, 1, 0, 0, 0).earliest())
        .map(|dt| dt.offset().fix().local_minus_utc())
        .min();

    match standard {
        Some(standard) if now.offset().fix().local_minus_utc() > standard => 1,
        _ => 0,
    }
}

/// Scans forward from `start_offset` and returns the first hour offset whose
/// `HourlyData_` file is missing from `folder`. Returns `lookback_limit` when
/// nothing is missing below it.
///
/// Only the earliest gap is reported; files present beyond it are not
/// inspected.
pub fn hours_since_last_gap(
    lookback_limit: u32,
    folder: &Path,
    start_offset: u32,
    now: DateTime<Utc>,
) -> Result<u32, GapError> {
    for hours_ago in start_offset..lookback_limit {
        let path = folder.join(HourSlot::new(now, hours_ago).file_name());
        let exists = path.try_exists().map_err(|source| GapError::Io {
            path: path.clone(),
            source,
        })?;

        if !exists {
            debug!("First missing file is `{}`", path.display());
            return Ok(hours_ago);
        }
    }

    Ok(lookback_limit)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs::File;

    use chrono::FixedOffset;
    use chrono_tz::America::New_York;
    use tempfile::TempDir;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 18, 40, 0).unwrap()
    }

    fn folder_with(offsets: &[u32]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for &h in offsets {
            File::create(dir.path().join(HourSlot::new(now(), h).file_name())).unwrap();
        }
        dir
    }

    #[test]
    fn should_return_zero_when_latest_file_missing() {
        let dir = folder_with(&[2, 3, 5]);

        assert_eq!(hours_since_last_gap(10, dir.path(), 0, now()).unwrap(), 0);
    }

    #[test]
    fn should_start_at_one_under_dst() {
        let dir = folder_with(&[2, 3, 5]);

        assert_eq!(hours_since_last_gap(10, dir.path(), 1, now()).unwrap(), 1);
    }

    #[test]
    fn should_stop_at_first_gap_only() {
        // 4 is the first hole; 6, 8 and 9 are never reached
        let dir = folder_with(&[0, 1, 2, 3, 5, 7]);

        assert_eq!(hours_since_last_gap(10, dir.path(), 0, now()).unwrap(), 4);
    }

    #[test]
    fn should_return_lookback_when_complete() {
        let offsets: Vec<u32> = (0..10).collect();
        let dir = folder_with(&offsets);

        assert_eq!(hours_since_last_gap(10, dir.path(), 0, now()).unwrap(), 10);
    }

    #[test]
    fn should_return_lookback_when_start_beyond_it() {
        let dir = folder_with(&[]);

        assert_eq!(hours_since_last_gap(1, dir.path(), 1, now()).unwrap(), 1);
    }

    #[test]
    fn should_detect_dst_in_summer() {
        let summer = New_York.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let winter = New_York.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        assert_eq!(start_offset(&summer), 1);
        assert_eq!(start_offset(&winter), 0);
    }

    #[test]
    fn should_never_offset_fixed_zones() {
        let utc = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let est = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 7, 15, 12, 0, 0)
            .unwrap();

        assert_eq!(start_offset(&utc), 0);
        assert_eq!(start_offset(&est), 0);
    }
}
