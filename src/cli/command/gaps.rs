//! Report where the download folder first has a missing hour.

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};

use crate::{
    config,
    gap::{hours_since_last_gap, start_offset},
};

pub fn gaps(download_folder: Option<&Path>, lookback: u32) -> Result<u32> {
    let folder = config::download_folder(download_folder).map_err(|e| anyhow!(e))?;

    let hours = hours_since_last_gap(lookback, &folder, start_offset(&Local::now()), Utc::now())?;

    Ok(hours)
}

// -- Tests -------------------------------------------------------------------
