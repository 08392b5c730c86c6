//! Artifact downloading from Maven repositories, with HTTP conditional
//! revalidation (spec §4.4: `If-Modified-Since` from the cached file's
//! mtime) and bounded exponential-backoff retry on transient failures
//! (timeout, connection reset, 5xx — spec §5 "Timeouts").

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use reqwest::header::{IF_MODIFIED_SINCE, LAST_MODIFIED};

use crate::auth;
use crate::repository::MavenRepository;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a conditional GET.
pub enum Revalidation {
    /// 304: the cached copy is still current.
    NotModified,
    /// 200: fresh bytes.
    Modified(Vec<u8>),
    /// 404: not present in this repository.
    NotFound,
}

/// Build a shared reqwest client for Maven downloads.
pub fn build_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("jgo/0.2")
        .build()
        .map_err(|e| {
            jgo_util::errors::JgoError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            }
            .into()
        })
}

/// Download raw bytes from a URL, with authentication and retries.
///
/// Returns `Ok(bytes)` on success, or an error after exhausting retries.
/// Returns `Ok(None)` for 404 (artifact not found in this repo).
pub async fn download_bytes(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
) -> miette::Result<Option<Vec<u8>>> {
    let mut last_err = String::new();

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }

        let mut req = client.get(url);
        req = auth::apply_auth(req, repo);

        match req.send().await {
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if status.is_server_error() {
                    last_err = format!("HTTP {status} from {url}");
                    continue;
                }
                if !status.is_success() {
                    return Err(jgo_util::errors::JgoError::Network {
                        message: format!("HTTP {status} fetching {url}"),
                    }
                    .into());
                }

                let bytes =
                    resp.bytes()
                        .await
                        .map_err(|e| jgo_util::errors::JgoError::Network {
                            message: format!("Failed to read response from {url}: {e}"),
                        })?;
                return Ok(Some(bytes.to_vec()));
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_err = format!("{e}");
                continue;
            }
            Err(e) => {
                return Err(jgo_util::errors::JgoError::Network {
                    message: format!("Request to {url} failed: {e}"),
                }
                .into());
            }
        }
    }

    Err(jgo_util::errors::JgoError::Generic {
        message: format!("Failed after {MAX_RETRIES} retries for {url}: {last_err}"),
    }
    .into())
}

/// Download an artifact (JAR, POM, etc.) with a progress bar.
pub async fn download_artifact(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
    label: &str,
) -> miette::Result<Option<Vec<u8>>> {
    let mut req = client.get(url);
    req = auth::apply_auth(req, repo);

    let resp = req
        .send()
        .await
        .map_err(|e| jgo_util::errors::JgoError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(jgo_util::errors::JgoError::Network {
            message: format!("HTTP {} fetching {url}", resp.status()),
        }
        .into());
    }

    let total = resp.content_length().unwrap_or(0);
    let pb = if total > 100_000 {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("  {msg} {bar:30.cyan/dim} {bytes}/{total_bytes}")
                .unwrap()
                .progress_chars("##-"),
        );
        pb.set_message(label.to_string());
        Some(pb)
    } else {
        None
    };

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| jgo_util::errors::JgoError::Network {
            message: format!("Failed to read {url}: {e}"),
        })?;

    if let Some(pb) = pb {
        pb.set_position(bytes.len() as u64);
        pb.finish_and_clear();
    }

    Ok(Some(bytes.to_vec()))
}

/// Download a text file (POM, metadata, checksum sidecar).
pub async fn download_text(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
) -> miette::Result<Option<String>> {
    match download_bytes(client, repo, url).await? {
        Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).to_string())),
        None => Ok(None),
    }
}

/// GET `url` with `If-Modified-Since: <since>` attached when `since` is
/// given. Used by metadata revalidation (spec §4.4): a cache hit whose
/// mtime is sent back to the origin, yielding a cheap 304 when nothing
/// changed.
pub async fn revalidate(
    client: &Client,
    repo: &MavenRepository,
    url: &str,
    since: Option<SystemTime>,
) -> miette::Result<Revalidation> {
    let mut req = client.get(url);
    req = auth::apply_auth(req, repo);
    if let Some(since) = since {
        req = req.header(IF_MODIFIED_SINCE, http_date(since));
    }

    let resp = req
        .send()
        .await
        .map_err(|e| jgo_util::errors::JgoError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;

    match resp.status() {
        reqwest::StatusCode::NOT_MODIFIED => Ok(Revalidation::NotModified),
        reqwest::StatusCode::NOT_FOUND => Ok(Revalidation::NotFound),
        status if status.is_success() => {
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| jgo_util::errors::JgoError::Network {
                    message: format!("Failed to read response from {url}: {e}"),
                })?;
            Ok(Revalidation::Modified(bytes.to_vec()))
        }
        status => Err(jgo_util::errors::JgoError::Network {
            message: format!("HTTP {status} revalidating {url}"),
        }
        .into()),
    }
}

/// The origin's `Last-Modified` response header, if present, for storing
/// alongside a freshly cached file so the next request can revalidate.
pub fn last_modified_header(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn http_date(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
