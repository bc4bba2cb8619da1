//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made against the portal:
//! - Building the HTTP client
//! - Building the request headers
//! - GET requests with a per-request timeout
//! - Retry logic with a fixed attempt bound and a fixed pause
//! - Error classification

use crate::config::HttpConfig;
use crate::TenderError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Retry behavior for a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Pause between two consecutive attempts
    pub delay: Duration,
    /// Timeout applied to every individual request
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.retry_delay(),
            request_timeout: config.request_timeout(),
        }
    }
}

/// A successfully fetched (status 200) response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Response body
    pub body: String,
}

/// Builds the HTTP client shared by every request of a run
///
/// Headers are attached per request (see [`build_headers`]), so the client
/// itself carries only transport settings.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the request headers for portal requests
///
/// An unusable user agent (non-visible ASCII) is dropped rather than sent
/// malformed.
pub fn build_headers(config: &HttpConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&config.user_agent) {
        Ok(value) => {
            headers.insert(USER_AGENT, value);
        }
        Err(e) => {
            tracing::warn!("Ignoring invalid user agent '{}': {}", config.user_agent, e);
        }
    }
    headers
}

/// Performs one GET request
///
/// Only status 200 counts as success; every other status is an error.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `headers` - Request headers
/// * `timeout` - Timeout for this request
pub async fn fetch_once(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    timeout: Duration,
) -> Result<FetchedPage, TenderError> {
    let response = client
        .get(url)
        .headers(headers.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(TenderError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(|e| TenderError::Body {
        url: url.to_string(),
        source: e,
    })?;

    Ok(FetchedPage {
        url: final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Fetches a URL, retrying on transport errors and non-200 statuses
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 200 | Return immediately |
/// | Any other status | Retry after `delay` |
/// | Timeout / connection / DNS error | Retry after `delay` |
/// | Attempts exhausted | Return `None` |
///
/// There is no pause after the last attempt, so `max_attempts` failures
/// cost `max_attempts - 1` pauses. Each failed attempt is logged.
///
/// # Returns
///
/// * `Some(FetchedPage)` - A status 200 response
/// * `None` - Every attempt failed
pub async fn fetch_with_retries(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    policy: &RetryPolicy,
) -> Option<FetchedPage> {
    for attempt in 1..=policy.max_attempts {
        match fetch_once(client, url, headers, policy.request_timeout).await {
            Ok(page) => return Some(page),
            Err(TenderError::Status { status, .. }) => {
                tracing::warn!(
                    "HTTP {} for {} (attempt {}/{})",
                    status,
                    url,
                    attempt,
                    policy.max_attempts
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Network error: {} (attempt {}/{})",
                    e,
                    attempt,
                    policy.max_attempts
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    None
}

/// Maps a transport error onto the crate error type
fn classify_error(url: &str, error: reqwest::Error) -> TenderError {
    if error.is_timeout() {
        TenderError::Timeout {
            url: url.to_string(),
        }
    } else {
        TenderError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
