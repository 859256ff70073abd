//! Crawler service abstraction.
//!
//! The handler only needs to ask a catalog service to start a named
//! crawler. [`CrawlerService`] is that seam; [`HttpCrawlerService`] talks to
//! an HTTP control endpoint and tests substitute their own implementation.
//!
//! # Implementing a New Service
//!
//! 1. Create a new file in `src/crawler/` (e.g., `local.rs`)
//! 2. Implement the [`CrawlerService`] trait
//! 3. Export it in this module

mod http;

pub use http::{HttpCrawlerConfig, HttpCrawlerConfigBuilder, HttpCrawlerService};

use serde::{Deserialize, Serialize};

/// Result of a start-crawler request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The crawler accepted the start request
    Started,
    /// A run of the crawler is already in progress
    AlreadyRunning,
    /// The request failed for any other reason
    Failed(String),
}

/// Starts catalog crawlers.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one service can back many
/// handler invocations.
pub trait CrawlerService: Send + Sync {
    /// Ask the service to start the crawler called `name`.
    ///
    /// Called once per non-empty batch. Implementations do not retry.
    fn start_crawler(&self, name: &str) -> CrawlOutcome;

    /// Service name for logging.
    fn name(&self) -> &str;
}
