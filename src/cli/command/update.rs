//! Download every missing hour and write its IDEM EST file.

use std::{fmt, path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Local, Timelike, Utc};
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use reqwest::Client;

use crate::{
    cli::create_progress_bar,
    config::Config,
    download::{build_client, download_slot, Download},
    filter::filter_file,
    gap::{hours_since_last_gap, start_offset},
    slot::HourSlot,
};

/// Pause after each slot that reached the server.
const SLOT_PAUSE: Duration = Duration::from_millis(100);

/// Files for hour H are published around H:30.
const PUBLISH_MINUTE: u32 = 30;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: u32,
    pub not_found: u32,
    pub unfiltered: u32,
    pub filtered: u32,
    pub failed: u32,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours attempted: {} IDEM EST files saved, {} without output, {} not published, {} failed",
            self.attempted, self.filtered, self.unfiltered, self.not_found, self.failed
        )
    }
}

enum SlotOutcome {
    NotFound,
    Unfiltered,
    Filtered(PathBuf),
}

pub async fn update(config: &Config) -> Result<RunSummary> {
    run(config, Local::now()).await
}

async fn run(config: &Config, now: DateTime<Local>) -> Result<RunSummary> {
    let client = build_client()?;
    let utc_now = now.with_timezone(&Utc);

    let gap = match hours_since_last_gap(
        config.lookback_limit,
        &config.download_folder,
        start_offset(&now),
        utc_now,
    ) {
        Ok(gap) => gap,
        Err(e) => {
            error!("{}", e);
            config.hours_to_get
        }
    };
    let hours_to_get = hours_to_fetch(config.hours_to_get, gap);
    let latest = latest_published(now.minute());

    info!(
        "First missing file is {} hours back; fetching {} to {} hours back",
        gap, hours_to_get, latest
    );

    let slots: Vec<HourSlot> = (latest..=hours_to_get)
        .rev()
        .map(|hours_ago| HourSlot::new(utc_now, hours_ago))
        .collect();

    let bar = if config.verbose {
        ProgressBar::hidden()
    } else {
        create_progress_bar(slots.len() as u64, "Fetching hourly files".to_string())
    };

    let mut summary = RunSummary::default();
    for slot in &slots {
        bar.set_message(slot.file_name());
        summary.attempted += 1;

        match process_slot(&client, slot, config).await {
            Ok(SlotOutcome::NotFound) => summary.not_found += 1,
            Ok(SlotOutcome::Unfiltered) => {
                bar.suspend(|| warn!("No IDEM EST output file produced for `{}`", slot.file_name()));
                summary.unfiltered += 1;
            }
            Ok(SlotOutcome::Filtered(output_file)) => {
                bar.suspend(|| info!("IDEM EST file saved as `{}`", output_file.display()));
                summary.filtered += 1;
            }
            Err(e) => {
                bar.suspend(|| error!("{:#}", e));
                summary.failed += 1;
            }
        }

        bar.inc(1);
    }
    bar.finish_with_message("Hourly files processed");

    Ok(summary)
}

async fn process_slot(client: &Client, slot: &HourSlot, config: &Config) -> Result<SlotOutcome> {
    let download =
        download_slot(client, slot, &config.base_url, &config.download_folder).await?;
    debug!("Hour {} resolved to `{}`", slot.hours_ago, download.path().display());

    let outcome: Result<SlotOutcome> = match &download {
        Download::NotFound(_) => Ok(SlotOutcome::NotFound),
        Download::Saved(path) => filter_file(path, &config.output_folder)
            .map(|output| output.map_or(SlotOutcome::Unfiltered, SlotOutcome::Filtered))
            .map_err(Into::into),
    };

    tokio::time::sleep(SLOT_PAUSE).await;

    outcome
}

/// The gap only widens the request when more than one hour was asked for.
fn hours_to_fetch(requested: u32, gap: u32) -> u32 {
    if requested > 1 {
        requested.max(gap)
    } else {
        gap
    }
}

/// Hours back to the newest file expected to be on the server.
fn latest_published(minute: u32) -> u32 {
    if minute < PUBLISH_MINUTE {
        2
    } else {
        1
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::testing::{ok_response, serve_forever, NOT_FOUND, SERVER_ERROR};

    fn init_logging() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .is_test(true)
            .try_init();
    }

    const BODY: &str = "\
06/01/24|18:00|180190008|Charlestown SP|-5|OZONE|PPB|41|Indiana Dept. of Env. Mgt
06/01/24|18:00|211110067|Louisville|-5|PM2.5|UG/M3|9.1|Louisville APCD
";

    fn config(base_url: String, download: &TempDir, idem: &TempDir) -> Config {
        Config {
            hours_to_get: 3,
            lookback_limit: 120,
            base_url,
            download_folder: download.path().to_path_buf(),
            output_folder: idem.path().to_path_buf(),
            verbose: true,
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 14, 45, 0).unwrap()
    }

    #[test]
    fn should_widen_to_gap_only_when_forcing_several_hours() {
        assert_eq!(hours_to_fetch(4, 10), 10);
        assert_eq!(hours_to_fetch(4, 0), 4);
        assert_eq!(hours_to_fetch(1, 10), 10);
        assert_eq!(hours_to_fetch(1, 0), 0);
    }

    #[test]
    fn should_wait_for_half_past_publication() {
        assert_eq!(latest_published(0), 2);
        assert_eq!(latest_published(29), 2);
        assert_eq!(latest_published(30), 1);
        assert_eq!(latest_published(59), 1);
    }

    #[tokio::test]
    async fn should_download_and_filter_each_hour() {
        init_logging();
        let base_url = serve_forever(ok_response(BODY)).await;
        let download = TempDir::new().unwrap();
        let idem = TempDir::new().unwrap();

        let summary = run(&config(base_url, &download, &idem), now()).await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.filtered, 3);
        assert_eq!(fs::read_dir(download.path()).unwrap().count(), 3);
        assert_eq!(fs::read_dir(idem.path()).unwrap().count(), 3);
        for entry in fs::read_dir(idem.path()).unwrap() {
            let contents = fs::read_to_string(entry.unwrap().path()).unwrap();
            assert_eq!(contents.lines().count(), 1);
        }
    }

    #[tokio::test]
    async fn should_skip_unpublished_hours() {
        let base_url = serve_forever(NOT_FOUND).await;
        let download = TempDir::new().unwrap();
        let idem = TempDir::new().unwrap();

        let summary = run(&config(base_url, &download, &idem), now()).await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.not_found, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(fs::read_dir(idem.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn should_keep_going_after_failed_hours() {
        init_logging();
        let base_url = serve_forever(SERVER_ERROR).await;
        let download = TempDir::new().unwrap();
        let idem = TempDir::new().unwrap();

        let summary = run(&config(base_url, &download, &idem), now()).await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.failed, 3);
        assert_eq!(fs::read_dir(download.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn should_log_failures_alongside_progress_bar() {
        init_logging();
        let base_url = serve_forever(SERVER_ERROR).await;
        let download = TempDir::new().unwrap();
        let idem = TempDir::new().unwrap();
        let mut config = config(base_url, &download, &idem);
        config.verbose = false;

        let summary = run(&config, now()).await.unwrap();

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.filtered, 0);
    }
}
