//! Notification handler that starts the catalog crawler.

use crate::config::{ConfigValidationError, TriggerConfig};
use crate::crawler::{CrawlOutcome, CrawlerService};
use crate::error::TriggerError;
use crate::event::S3Event;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Status code and message returned to the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Starts the configured crawler once per notification batch.
///
/// # Example
///
/// ```rust,ignore
/// use crawl_trigger::{HttpCrawlerService, TriggerConfig, TriggerHandler};
/// use std::sync::Arc;
///
/// let service = Arc::new(HttpCrawlerService::new("http://catalog:9000")?);
/// let handler = TriggerHandler::new(TriggerConfig::default(), service)?;
/// let response = handler.handle_json(&payload);
/// ```
pub struct TriggerHandler {
    config: TriggerConfig,
    crawler: Arc<dyn CrawlerService>,
}

static_assertions::assert_impl_all!(TriggerHandler: Send, Sync);

impl TriggerHandler {
    /// Create a handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: TriggerConfig,
        crawler: Arc<dyn CrawlerService>,
    ) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self { config, crawler })
    }

    pub fn crawler_name(&self) -> &str {
        &self.config.crawler_name
    }

    /// Handle a parsed notification batch.
    ///
    /// An empty batch is acknowledged without starting the crawler.
    /// Otherwise the crawler is started exactly once, whatever the batch
    /// size, and the response names the last key in the batch.
    pub fn handle(&self, event: &S3Event) -> HandlerResponse {
        info!("Received event with {} record(s)", event.records.len());
        for record in &event.records {
            info!(
                "New object: bucket={}, key={}",
                record.bucket(),
                record.key()
            );
        }

        let Some(last_key) = event.last_key() else {
            info!("No records in event, crawler not started");
            return HandlerResponse::new(200, "No new files received; crawler not started.");
        };

        let name = self.crawler_name();
        match self.crawler.start_crawler(name) {
            CrawlOutcome::Started => {
                info!(
                    "Crawler '{}' started via {} service",
                    name,
                    self.crawler.name()
                );
                HandlerResponse::new(
                    200,
                    format!("Crawler '{}' triggered for file {}.", name, last_key),
                )
            }
            CrawlOutcome::AlreadyRunning => {
                warn!("Crawler '{}' is already running", name);
                HandlerResponse::new(409, format!("Crawler '{}' is already running.", name))
            }
            CrawlOutcome::Failed(reason) => {
                error!("Error triggering crawler '{}': {}", name, reason);
                HandlerResponse::new(500, format!("Error triggering crawler: {}", reason))
            }
        }
    }

    /// Parse and handle a raw JSON notification.
    ///
    /// A payload that does not parse becomes a 500 response; the crawler is
    /// not started.
    pub fn handle_json(&self, payload: &str) -> HandlerResponse {
        self.handle_parsed(S3Event::from_json(payload))
    }

    /// Handle the result of reading an event.
    ///
    /// A read or parse error becomes a 500 response; the crawler is not
    /// started.
    pub fn handle_parsed(&self, event: Result<S3Event, TriggerError>) -> HandlerResponse {
        match event {
            Ok(event) => self.handle(&event),
            Err(e) => {
                error!("Error triggering crawler: {}", e);
                HandlerResponse::new(500, format!("Error triggering crawler: {}", e))
            }
        }
    }
}
