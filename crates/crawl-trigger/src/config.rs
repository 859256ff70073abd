//! Configuration for the trigger handler.

use serde::{Deserialize, Serialize};

/// Crawler started when new raw data lands.
pub const DEFAULT_CRAWLER_NAME: &str = "tcga_data_crawler";

/// Configuration for [`TriggerHandler`](crate::handler::TriggerHandler).
///
/// # Example
///
/// ```rust,ignore
/// use crawl_trigger::TriggerConfig;
///
/// let config = TriggerConfig::builder()
///     .crawler_name("tcga_data_crawler")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Name of the crawler to start.
    /// Default: "tcga_data_crawler"
    pub crawler_name: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            crawler_name: DEFAULT_CRAWLER_NAME.to_string(),
        }
    }
}

impl TriggerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TriggerConfigBuilder {
        TriggerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.crawler_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyCrawlerName);
        }
        if self.crawler_name.contains('/') {
            return Err(ConfigValidationError::InvalidCrawlerName(
                self.crawler_name.clone(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("crawler_name must not be empty")]
    EmptyCrawlerName,

    #[error("crawler_name '{0}' must not contain '/'")]
    InvalidCrawlerName(String),
}

/// Builder for [`TriggerConfig`].
#[derive(Debug, Default)]
pub struct TriggerConfigBuilder {
    crawler_name: Option<String>,
}

impl TriggerConfigBuilder {
    /// Set the crawler to start.
    pub fn crawler_name(mut self, name: impl Into<String>) -> Self {
        self.crawler_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `TriggerConfig` or an error if validation fails.
    pub fn build(self) -> Result<TriggerConfig, ConfigValidationError> {
        let config = TriggerConfig {
            crawler_name: self
                .crawler_name
                .unwrap_or_else(|| DEFAULT_CRAWLER_NAME.to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_crawler_name() {
        let config = TriggerConfig::builder().build().unwrap();
        assert_eq!(config.crawler_name, "tcga_data_crawler");
    }

    #[test]
    fn test_empty_crawler_name_rejected() {
        let err = TriggerConfig::builder().crawler_name("").build().unwrap_err();
        assert!(matches!(err, ConfigValidationError::EmptyCrawlerName));
    }

    #[test]
    fn test_crawler_name_with_slash_rejected() {
        let result = TriggerConfig::builder().crawler_name("a/b").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_deserializes() {
        let config: TriggerConfig =
            serde_json::from_str(r#"{"crawler_name":"other_crawler"}"#).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.crawler_name, "other_crawler");
    }
}
