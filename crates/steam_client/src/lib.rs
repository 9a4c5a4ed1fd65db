//! Steam Web API client.
//!
//! Fetches the achievement schema and global unlock percentages for one app
//! and converts both payloads into the shared types.

pub mod percentages;
pub mod schema;

use std::error::Error as StdError;
use std::time::Duration;

use common::{Achievement, Error, PercentageMap};
use reqwest::Url;
use tracing::{debug, warn};

pub use percentages::{normalize_percentages, parse_percentages};
pub use schema::{normalize_schema, parse_schema};

pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Upper bound on the error-body snippet kept for diagnostics.
pub const MAX_ERROR_BODY_BYTES: usize = 4096;

const SCHEMA_PATH: &str = "/ISteamUserStats/GetSchemaForGame/v2/";
const PERCENTAGES_PATH: &str = "/ISteamUserStats/GetGlobalAchievementPercentagesForApp/v0002/";

fn format_reqwest_error(err: reqwest::Error) -> String {
    // The URL carries the API key, so only the causes are kept.
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

/// Cut a response body to at most [`MAX_ERROR_BODY_BYTES`] of text.
fn body_snippet(raw: &[u8]) -> String {
    let head = &raw[..raw.len().min(MAX_ERROR_BODY_BYTES)];
    let mut text = String::from_utf8_lossy(head).into_owned();
    if text.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error body, chunk by chunk.
///
/// A failed read keeps whatever arrived before it.
async fn read_error_body(mut resp: reqwest::Response) -> String {
    let mut head: Vec<u8> = Vec::new();
    while head.len() < MAX_ERROR_BODY_BYTES {
        match resp.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_ERROR_BODY_BYTES - head.len());
                head.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                warn!(
                    "Error body read stopped after {} bytes: {}",
                    head.len(),
                    format_reqwest_error(e)
                );
                break;
            }
        }
    }
    body_snippet(&head)
}

/// Printable form of a request URL with the `key` parameter masked.
fn redacted(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "REDACTED".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

/// Steam Web API client with connection pooling and a fixed request timeout.
///
/// No retries: the first failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct SteamClient {
    client: reqwest::Client,
    base_url: String,
}

impl SteamClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Point the client at another host (a proxy, or a local server in tests).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("achievement-board/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .expect("failed to build Steam HTTP client");

        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse_with_params(&raw, query)
            .map_err(|e| Error::Config(format!("invalid Steam URL {raw}: {e}")))
    }

    /// GET `url` and return the body of a 2xx response.
    async fn get_body(&self, url: Url) -> Result<Vec<u8>, Error> {
        let target = redacted(&url);
        debug!("Fetching {}", target);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http {
                target: target.clone(),
                message: format_reqwest_error(e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = read_error_body(resp).await;
            return Err(Error::UpstreamStatus {
                target,
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(|e| Error::Http {
            target: target.clone(),
            message: format_reqwest_error(e),
        })?;

        debug!("{} returned {} bytes", target, body.len());
        Ok(body.to_vec())
    }

    /// Fetch the localized achievement schema for `app_id`.
    ///
    /// Fails with [`Error::MissingCredential`] without touching the network
    /// when `api_key` is absent or blank.
    pub async fn fetch_schema(
        &self,
        app_id: u32,
        language: &str,
        api_key: Option<&str>,
    ) -> Result<Vec<Achievement>, Error> {
        let key = api_key.map(str::trim).filter(|k| !k.is_empty()).ok_or_else(|| {
            Error::MissingCredential(
                "STEAM_API_KEY is not set (required for GetSchemaForGame)".into(),
            )
        })?;

        let app_id = app_id.to_string();
        let url = self.url(
            SCHEMA_PATH,
            &[
                ("key", key),
                ("appid", app_id.as_str()),
                ("l", language),
                ("format", "json"),
            ],
        )?;

        let body = self.get_body(url).await?;
        let achs = parse_schema(&body)?;
        debug!("Schema for app {} has {} achievements", app_id, achs.len());
        Ok(achs)
    }

    /// Fetch global unlock percentages for `app_id`. No key required.
    pub async fn fetch_global_percentages(&self, app_id: u32) -> Result<PercentageMap, Error> {
        let app_id = app_id.to_string();
        let url = self.url(
            PERCENTAGES_PATH,
            &[("gameid", app_id.as_str()), ("format", "json")],
        )?;

        let body = self.get_body(url).await?;
        let map = parse_percentages(&body)?;
        debug!("Percentages for app {} cover {} keys", app_id, map.len());
        Ok(map)
    }
}

impl Default for SteamClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
