//! Crawl Trigger
//!
//! Reacts to object-created notifications for the raw genomic dataset by
//! starting the catalog crawler, so that newly landed files become visible
//! to downstream queries.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crawl_trigger::{HttpCrawlerService, TriggerConfig, TriggerHandler};
//! use std::sync::Arc;
//!
//! let service = Arc::new(HttpCrawlerService::new("http://catalog:9000")?);
//! let handler = TriggerHandler::new(TriggerConfig::default(), service)?;
//!
//! let response = handler.handle_json(&payload);
//! println!("{}: {}", response.status_code, response.body);
//! ```
//!
//! # Responses
//!
//! | Outcome                    | Status | Body                                            |
//! |----------------------------|--------|-------------------------------------------------|
//! | crawler started            | 200    | `Crawler '<name>' triggered for file <key>.`    |
//! | empty batch                | 200    | no crawler call                                 |
//! | crawler already running    | 409    | `Crawler '<name>' is already running.`          |
//! | any other failure          | 500    | `Error triggering crawler: <reason>`            |

pub mod config;
pub mod crawler;
pub mod error;
pub mod event;
pub mod handler;

pub use config::{ConfigValidationError, DEFAULT_CRAWLER_NAME, TriggerConfig, TriggerConfigBuilder};
pub use crawler::{CrawlOutcome, CrawlerService, HttpCrawlerConfig, HttpCrawlerService};
pub use error::{Result as TriggerResult, ResultExt, TriggerError};
pub use event::{S3Event, S3EventRecord};
pub use handler::{HandlerResponse, TriggerHandler};
