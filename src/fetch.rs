//! Page fetching with header hardening and exponential backoff retry logic.
//!
//! This module provides the HTTP boundary for the scraping pipeline. The news
//! sites intermittently answer automated traffic with 403/429, so the fetcher
//! sends a browser-like header set, rotates its User-Agent per request, and
//! retries transient failures with exponential backoff and jitter.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`PageFetch`]: Core trait defining async page retrieval
//! - [`HttpFetcher`]: reqwest-backed implementation with bounded timeouts
//! - [`RetryFetch`]: Decorator that adds retry logic to any `PageFetch` implementation
//!
//! # Retry Strategy
//!
//! - Retries only transient failures (network errors, 403, 429, 5xx)
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Browser User-Agent strings rotated across requests.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// A successfully fetched page.
#[derive(Debug)]
pub struct FetchedPage {
    /// The HTTP status code of the final response.
    pub status: StatusCode,
    /// The response body as text.
    pub body: String,
}

/// Errors produced at the fetch boundary.
///
/// Callers inside the date pipeline never propagate these; a failed fetch
/// collapses to "no signal" at the strategy boundary.
#[derive(Debug)]
pub enum FetchError {
    /// The request failed before a response arrived (DNS, connect, timeout).
    Request(reqwest::Error),
    /// The server answered with a non-success status.
    Status(StatusCode),
}

impl FetchError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Mirrors the status forcelist the sites are known to answer with when
    /// rate limiting: 403, 429, and the 5xx family. Everything else (404,
    /// redirects-to-login, parse-level failures) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request(_) => true,
            FetchError::Status(status) => {
                matches!(
                    *status,
                    StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                ) || status.is_server_error()
            }
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(e) => write!(f, "request failed: {}", e),
            FetchError::Status(status) => write!(f, "unexpected status: {}", status),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Request(e) => Some(e),
            FetchError::Status(_) => None,
        }
    }
}

/// Trait for async page retrieval.
///
/// Implementors fetch a URL and return its body text. This abstraction lets
/// the article resolver take any fetcher (real HTTP, retrying decorator, or
/// a canned stub in tests).
pub trait PageFetch {
    /// Fetch a page and return its status and body.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed [`PageFetch`] implementation.
///
/// The client carries a browser-like default header set and a bounded
/// per-request timeout. The User-Agent is chosen per request from
/// [`USER_AGENTS`].
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the TLS backend cannot be
    /// initialized.
    pub fn new(timeout: StdDuration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9,fil;q=0.8"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    fn pick_user_agent() -> &'static str {
        USER_AGENTS[rng().random_range(0..USER_AGENTS.len())]
    }
}

impl PageFetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let user_agent = Self::pick_user_agent();
        debug!(user_agent, "Fetching page");

        let referer = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| format!("https://{}/", h)));

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent);
        if let Some(referer) = referer.as_deref().and_then(|r| HeaderValue::from_str(r).ok()) {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(FetchError::Request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(FetchError::Request)?;
        debug!(bytes = body.len(), %status, "Fetched page");
        Ok(FetchedPage { status, body })
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`PageFetch`]
/// implementation.
///
/// Transient failures (see [`FetchError::is_transient`]) are retried with
/// exponential backoff and jitter; permanent failures are returned
/// immediately.
///
/// # Backoff Strategy
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: PageFetch,
{
    /// Create a new retry wrapper around an existing [`PageFetch`] implementation.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying fetcher to wrap
    /// * `max_retries` - Maximum number of retry attempts (3 recommended)
    /// * `base_delay` - Initial delay between retries (1 second recommended)
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetch for RetryFetch<T>
where
    T: PageFetch,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    attempt += 1;

                    if !e.is_transient() || attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            transient = e.is_transient(),
                            "fetch() giving up"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
