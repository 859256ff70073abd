//! Error types for the crawl trigger.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading events or building crawler clients.
///
/// Crawler call failures are not errors: they come back as
/// [`CrawlOutcome::Failed`](crate::crawler::CrawlOutcome::Failed).
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Event file not found: {0}")]
    EventNotFound(PathBuf),

    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TriggerError>,
    },
}

impl TriggerError {
    /// Wrap this error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::MalformedEvent(_) => "MALFORMED_EVENT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Http(_) => "HTTP_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriggerError>;

/// Extension trait for adding context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TriggerError::Io(e).with_context(context))
    }
}
