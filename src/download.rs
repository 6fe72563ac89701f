//! Downloads a single hourly AirNow file.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use futures::StreamExt;
use log::{debug, info};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::slot::HourSlot;

/// AirNow's bucket rejects requests without a browser-like agent.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; Trident/7.0; AS; rv:11.0) like Gecko";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a download attempt that did not fail.
pub enum Download {
    /// The body was written to this path.
    Saved(PathBuf),
    /// The server has not published the file yet. Nothing was written.
    NotFound(PathBuf),
}

impl Download {
    pub fn path(&self) -> &Path {
        match self {
            Download::Saved(path) | Download::NotFound(path) => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to `{url}` failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status} for `{url}`")]
    Status { url: String, status: StatusCode },
    #[error("could not write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Builds the HTTP client used for every slot of a run.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(USER_AGENT).build()
}

/// Downloads the file for `slot` from `base_url` into `local_folder`.
///
/// A 404 is reported as [`Download::NotFound`]; every other failure is an error.
pub async fn download_slot(
    client: &Client,
    slot: &HourSlot,
    base_url: &str,
    local_folder: &Path,
) -> Result<Download, FetchError> {
    let file_name = slot.file_name();
    let url = format!("{}{}", base_url, file_name);
    let local_path = local_folder.join(&file_name);

    debug!("Fetching `{}` ({} hours ago)", url, slot.hours_ago);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        info!("`{}` is not published yet", file_name);
        return Ok(Download::NotFound(local_path));
    }
    if !status.is_success() {
        return Err(FetchError::Status { url, status });
    }

    if let Err(e) = save_body(response, &url, &local_path).await {
        // A partial file would look like a completed slot to the gap scan
        let _ = fs::remove_file(&local_path);
        return Err(e);
    }

    info!("Saved `{}`", local_path.display());

    Ok(Download::Saved(local_path))
}

async fn save_body(response: Response, url: &str, file_path: &Path) -> Result<(), FetchError> {
    let io_error = |source| FetchError::Io {
        path: file_path.to_path_buf(),
        source,
    };

    let mut file = File::create(file_path).map_err(io_error)?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        file.write_all(&chunk).map_err(io_error)?;
    }
    file.flush().map_err(io_error)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
