//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_HOURS_BACK, DEFAULT_LOOKBACK};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    /// Show messages while the program is running
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download missing hourly files and save the Southern Indiana rows in EST
    Update(UpdateArgs),
    /// Save the Southern Indiana rows of one downloaded hourly file
    Filter {
        /// An `HourlyData_YYYYMMDDHH.dat` file
        file: PathBuf,
        /// Where to save the IDEM EST file [default: ~/AirVisionImport]
        #[arg(short, long)]
        idem_folder: Option<PathBuf>,
    },
    /// Report how many hours back the first missing hourly file is
    Gaps {
        /// Folder of downloaded hourly files [default: ~/AirNow]
        #[arg(short, long)]
        download_folder: Option<PathBuf>,
        /// Maximum hours to search back
        #[arg(short, long, default_value_t = DEFAULT_LOOKBACK)]
        lookback: u32,
    },
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Hours to force (re)download. Missing files further back are fetched up to the lookback
    #[arg(short = 'H', long, default_value_t = DEFAULT_HOURS_BACK, allow_negative_numbers = true)]
    pub hours_back: i64,
    /// Maximum hours to search back for missing files
    #[arg(short, long, default_value_t = DEFAULT_LOOKBACK)]
    pub lookback: u32,
    /// The website and folder to download AirNow files from
    #[arg(short = 'u', long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Where to download AirNow hourly files to [default: ~/AirNow]
    #[arg(short, long)]
    pub download_folder: Option<PathBuf>,
    /// Where to save the Southern Indiana EST files [default: ~/AirVisionImport]
    #[arg(short, long)]
    pub idem_folder: Option<PathBuf>,
}

/// Logs at `Info` when verbose, `Warn` otherwise. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
