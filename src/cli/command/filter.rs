//! Re-filter one hourly file that is already on disk.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::{cli::create_spinner, config, filter::filter_file};

pub fn filter(file: &Path, idem_folder: Option<&Path>) -> Result<Option<PathBuf>> {
    let output_folder = config::idem_folder(idem_folder).map_err(|e| anyhow!(e))?;

    let bar = create_spinner(format!("Filtering `{}`...", file.display()));
    let output_file = filter_file(file, &output_folder)?;
    bar.finish_and_clear();

    Ok(output_file)
}

// -- Tests -------------------------------------------------------------------
