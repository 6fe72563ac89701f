//! Validated run settings.

use std::path::{Path, PathBuf};

use reqwest::Url;
use thiserror::Error;

use crate::cli::UpdateArgs;

pub const DEFAULT_BASE_URL: &str =
    "https://s3-us-west-1.amazonaws.com/files.airnowtech.org/airnow/today/";
pub const DEFAULT_HOURS_BACK: i64 = 4;
pub const DEFAULT_LOOKBACK: u32 = 120;

const DEFAULT_DOWNLOAD_DIR: &str = "AirNow";
const DEFAULT_IDEM_DIR: &str = "AirVisionImport";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{}", .0.join(" "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hours to (re)download even when no gap is found.
    pub hours_to_get: u32,
    /// How far back the gap scan looks.
    pub lookback_limit: u32,
    /// Always ends with `/`.
    pub base_url: String,
    pub download_folder: PathBuf,
    pub output_folder: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Checks every setting and reports all problems at once.
    pub fn from_args(args: &UpdateArgs, verbose: bool) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();

        let hours_to_get = match u32::try_from(args.hours_back) {
            Ok(hours) if hours > 0 => Some(hours),
            _ => {
                errors.push(format!(
                    "Hours to get must be a positive whole number; {} is not valid.",
                    args.hours_back
                ));
                None
            }
        };
        let base_url = validate_base_url(&args.base_url).map_err(|e| errors.push(e)).ok();
        let download_folder = download_folder(args.download_folder.as_deref())
            .map_err(|e| errors.push(e))
            .ok();
        let output_folder = idem_folder(args.idem_folder.as_deref())
            .map_err(|e| errors.push(e))
            .ok();

        match (hours_to_get, base_url, download_folder, output_folder) {
            (Some(hours_to_get), Some(base_url), Some(download_folder), Some(output_folder)) => {
                Ok(Config {
                    hours_to_get,
                    lookback_limit: args.lookback,
                    base_url,
                    download_folder,
                    output_folder,
                    verbose,
                })
            }
            _ => Err(ConfigError::Invalid(errors)),
        }
    }
}

/// Accepts absolute http(s) URLs and returns them normalised with a trailing `/`.
pub fn validate_base_url(base_url: &str) -> Result<String, String> {
    let invalid = || format!("Invalid Web address '{}'.", base_url);

    let url = Url::parse(base_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }

    let mut normalised = url.to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }

    Ok(normalised)
}

/// Folder for raw `HourlyData_` files, defaulting to `~/AirNow`.
pub fn download_folder(folder: Option<&Path>) -> Result<PathBuf, String> {
    resolve_folder(folder, DEFAULT_DOWNLOAD_DIR)
}

/// Folder for `IDEM_EST_` files, defaulting to `~/AirVisionImport`.
pub fn idem_folder(folder: Option<&Path>) -> Result<PathBuf, String> {
    resolve_folder(folder, DEFAULT_IDEM_DIR)
}

// Uses `folder`, or `~/<default_name>` when none is given, and checks it exists.
fn resolve_folder(folder: Option<&Path>, default_name: &str) -> Result<PathBuf, String> {
    let folder = match folder {
        Some(folder) => folder.to_path_buf(),
        None => dirs::home_dir()
            .map(|home| home.join(default_name))
            .ok_or_else(|| {
                format!("No folder given and no home folder for '{}'.", default_name)
            })?,
    };

    if folder.is_dir() {
        Ok(folder)
    } else {
        Err(format!("Folder does not exist: '{}'.", folder.display()))
    }
}

// -- Tests -------------------------------------------------------------------
