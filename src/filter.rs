//! Extracts the Southern Indiana rows of an hourly file and restamps them in EST.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{error, info};
use thiserror::Error;

use crate::{
    reading::RawRecord,
    slot::{EXTENSION, FILE_TIMESTAMP_FORMAT, SOURCE_PREFIX},
};

pub const OUTPUT_PREFIX: &str = "IDEM_EST_";

/// Format of the timestamp prefix written to each row.
pub const LINE_TIMESTAMP_FORMAT: &str = "%m/%d/%y|%H:%M";

/// EST is applied all year round.
const EST_OFFSET_HOURS: i64 = -5;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("could not {action} `{path}`: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| FilterError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads the UTC hour embedded after `HourlyData_` in the file name.
pub fn source_timestamp(input_file: &Path) -> Option<NaiveDateTime> {
    let name = input_file.file_name()?.to_str()?;
    let start = name.find(SOURCE_PREFIX)? + SOURCE_PREFIX.len();
    let stamp = name.get(start..start + 10)?;

    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = stamp[0..4].parse().ok()?;
    let month = stamp[4..6].parse().ok()?;
    let day = stamp[6..8].parse().ok()?;
    let hour = stamp[8..10].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)
}

/// Writes the Southern Indiana rows of `input_file` to an `IDEM_EST_` file in
/// `output_folder`, replacing any earlier output for the same hour.
///
/// Returns `Ok(None)` when the file name carries no timestamp.
pub fn filter_file(input_file: &Path, output_folder: &Path) -> Result<Option<PathBuf>, FilterError> {
    let Some(utc) = source_timestamp(input_file) else {
        error!(
            "Error parsing date and time from filename `{}`",
            input_file.display()
        );
        return Ok(None);
    };

    let est = utc + Duration::hours(EST_OFFSET_HOURS);
    let timestamp = est.format(LINE_TIMESTAMP_FORMAT).to_string();
    let output_file = output_folder.join(format!(
        "{}{}{}",
        OUTPUT_PREFIX,
        est.format(FILE_TIMESTAMP_FORMAT),
        EXTENSION
    ));

    if output_file
        .try_exists()
        .map_err(FilterError::io("check", &output_file))?
    {
        fs::remove_file(&output_file).map_err(FilterError::io("delete", &output_file))?;
    }

    let reader = File::open(input_file)
        .map(BufReader::new)
        .map_err(FilterError::io("open", input_file))?;
    let mut writer = File::create(&output_file)
        .map(BufWriter::new)
        .map_err(FilterError::io("create", &output_file))?;

    let kept = match filter_lines(reader, &mut writer, &timestamp)
        .and_then(|kept| writer.flush().map(|_| kept))
    {
        Ok(kept) => kept,
        Err(e) => {
            // A short file would be imported as if it were complete
            drop(writer);
            let _ = fs::remove_file(&output_file);
            return Err(FilterError::io("filter into", &output_file)(e));
        }
    };

    info!(
        "Kept {} rows from `{}` in `{}`",
        kept,
        input_file.display(),
        output_file.display()
    );

    Ok(Some(output_file))
}

/// Copies qualifying rows from `reader` to `writer` with `timestamp` as their
/// new prefix. Returns the number of rows written.
///
/// Bytes that are not UTF-8 are replaced rather than rejected; site names
/// outside the US are often Latin-1.
pub fn filter_lines<R: BufRead, W: Write>(mut reader: R, writer: &mut W, timestamp: &str) -> io::Result<usize> {
    let mut kept = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');

        match RawRecord::from_line(line) {
            Some(record) if record.is_southern_indiana() => {
                writeln!(writer, "{}", record.with_timestamp(timestamp))?;
                kept += 1;
            }
            _ => {}
        }
    }

    Ok(kept)
}

// -- Tests -------------------------------------------------------------------
