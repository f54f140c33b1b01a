//! API client - HTTP GET with bounded retry against the GitHub REST API
//!
//! One shared `reqwest::Client` carries the default headers (JSON accept,
//! user agent, optional bearer token) and a fixed 30 second timeout. The
//! retry schedule is linear backoff and lives in [`RetryPolicy`] so tests
//! can run with zero delay against a local mock server.

use anyhow::{anyhow, Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Production API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounded linear-backoff retry schedule.
///
/// Attempt `n` (1-based) is followed by a sleep of `backoff_base * n` when
/// further attempts remain: with the defaults, 1.5s after the first failed
/// attempt and 3.0s after the second.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Base delay; the wait grows linearly with the attempt number.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1500),
        }
    }
}

/// A response whose status was in the caller's acceptable set.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to parse API response body as JSON")
    }
}

/// Thin GET-only client over the GitHub REST API.
///
/// Stateless across calls apart from connection reuse and default headers.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client against the production API with the default retry
    /// schedule. Requests are authenticated when a token is given.
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE, token, RetryPolicy::default())
    }

    /// Create a client against an arbitrary base URL.
    pub fn with_base_url(base_url: &str, token: Option<&str>, retry: RetryPolicy) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("pagescout/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("GITHUB_TOKEN contains characters that are not valid in a header")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// Issue a GET and return the response once its status is in
    /// `ok_statuses`, retrying otherwise per the [`RetryPolicy`].
    ///
    /// After exhaustion the error carries the final response's status and
    /// body; a transport error on the last attempt propagates as-is.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
        ok_statuses: &[StatusCode],
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_rejected: Option<(StatusCode, String)> = None;

        for attempt in 1..=self.retry.max_attempts {
            match self.http.get(&url).query(params).send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(body) if ok_statuses.contains(&status) => {
                            debug!("GET {} -> {} (attempt {})", url, status, attempt);
                            return Ok(ApiResponse { status, body });
                        }
                        Ok(body) => {
                            warn!(
                                "GET {} returned unexpected status {} (attempt {}/{})",
                                url, status, attempt, self.retry.max_attempts
                            );
                            last_rejected = Some((status, body));
                        }
                        Err(err) => {
                            if attempt == self.retry.max_attempts {
                                return Err(err).with_context(|| {
                                    format!("GET {url} failed reading the response body")
                                });
                            }
                            warn!("GET {} body read failed (attempt {}): {}", url, attempt, err);
                        }
                    }
                }
                Err(err) => {
                    if attempt == self.retry.max_attempts {
                        return Err(err).with_context(|| {
                            format!(
                                "GET {url} failed after {} attempts",
                                self.retry.max_attempts
                            )
                        });
                    }
                    warn!("GET {} failed (attempt {}): {}", url, attempt, err);
                }
            }

            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.backoff_base * attempt).await;
            }
        }

        let (status, body) =
            last_rejected.ok_or_else(|| anyhow!("GET {url} was configured with zero attempts"))?;
        Err(anyhow!(
            "GET {url} returned HTTP {status} after {} attempts: {body}",
            self.retry.max_attempts
        ))
    }
}
