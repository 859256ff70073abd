//! HTTP crawler control client.
//!
//! Starts a crawler with `POST <base_url>/crawlers/<name>/start`. The name is
//! sent as a single percent-encoded path segment.

use super::{CrawlOutcome, CrawlerService};
use crate::error::{Result, TriggerError};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Default control endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Error type the control endpoint reports for a crawler that is mid-run.
const RUNNING_EXCEPTION: &str = "CrawlerRunningException";

/// Configuration for [`HttpCrawlerService`].
#[derive(Debug, Clone)]
pub struct HttpCrawlerConfig {
    /// Base URL of the control endpoint.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpCrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: None,
        }
    }
}

impl HttpCrawlerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HttpCrawlerConfigBuilder {
        HttpCrawlerConfigBuilder::default()
    }
}

/// Builder for [`HttpCrawlerConfig`].
#[derive(Default)]
pub struct HttpCrawlerConfigBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

impl HttpCrawlerConfigBuilder {
    /// Set the control endpoint base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpCrawlerConfig {
        HttpCrawlerConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_token: self.api_token,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// [`CrawlerService`] backed by an HTTP control endpoint.
///
/// # Example
///
/// ```rust,ignore
/// use crawl_trigger::crawler::{HttpCrawlerConfig, HttpCrawlerService};
///
/// let config = HttpCrawlerConfig::builder()
///     .base_url("https://catalog.internal")
///     .api_token(token)
///     .build();
/// let service = HttpCrawlerService::with_config(config)?;
/// ```
pub struct HttpCrawlerService {
    config: HttpCrawlerConfig,
    base_url: Url,
    client: Client,
}

static_assertions::assert_impl_all!(HttpCrawlerService: Send, Sync);

impl HttpCrawlerService {
    /// Create a service for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(HttpCrawlerConfig::builder().base_url(base_url).build())
    }

    /// Create a service with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or not a hierarchical URL,
    /// or if the HTTP client cannot be created.
    pub fn with_config(config: HttpCrawlerConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(TriggerError::InvalidConfig(
                "Crawler endpoint must not be empty".to_string(),
            ));
        }

        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            TriggerError::InvalidConfig(format!(
                "Invalid crawler endpoint '{}': {}",
                config.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TriggerError::InvalidConfig(format!(
                "Crawler endpoint '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|e| TriggerError::from(e).with_context("Failed to build HTTP client"))?;

        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    fn start_url(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base is rejected in with_config
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["crawlers", name, "start"]);
        }
        url
    }
}

/// Map a control endpoint response to an outcome.
fn classify_response(status: StatusCode, body: &str) -> CrawlOutcome {
    if status.is_success() {
        CrawlOutcome::Started
    } else if status == StatusCode::CONFLICT || body.contains(RUNNING_EXCEPTION) {
        CrawlOutcome::AlreadyRunning
    } else if body.trim().is_empty() {
        CrawlOutcome::Failed(format!("Crawler endpoint returned {}", status))
    } else {
        CrawlOutcome::Failed(format!(
            "Crawler endpoint returned {}: {}",
            status,
            body.trim()
        ))
    }
}

impl CrawlerService for HttpCrawlerService {
    fn start_crawler(&self, name: &str) -> CrawlOutcome {
        let url = self.start_url(name);
        debug!("POST {}", url);

        let mut request = self.client.post(url);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        match request.send() {
            Ok(response) => {
                let status = response.status();
                match response.text() {
                    Ok(body) => classify_response(status, &body),
                    Err(e) => match classify_response(status, "") {
                        CrawlOutcome::Failed(reason) => CrawlOutcome::Failed(format!(
                            "{} (response body unreadable: {})",
                            reason, e
                        )),
                        outcome => outcome,
                    },
                }
            }
            Err(e) => CrawlOutcome::Failed(e.to_string()),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
