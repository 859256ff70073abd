//! Configuration types for the transform pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The defaults reproduce the production job: drop null rows, drop exact
//! duplicates, cast `gene_expression`/`mutation_id`/`date`, and partition by
//! `cancer_type`.

use crate::cleaner::normalize_column_name;
use crate::error::{ResultExt, TransformError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Default column used both for categorical normalization and partitioning.
pub const DEFAULT_PARTITION_COLUMN: &str = "cancer_type";

/// Default literal substituted for a null partition value.
pub const DEFAULT_UNKNOWN_CATEGORY: &str = "unknown";

/// What to do with values that fail to parse during type coercion.
///
/// Null filtering runs before coercion, so an unparseable value becomes a
/// fresh null that the null filter never sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CastFailurePolicy {
    /// Remove rows that gained a null during coercion
    #[default]
    DropRows,
    /// Keep the rows with the failed value set to null
    Keep,
    /// Abort the run
    Fail,
}

/// Target type for an explicit column cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastTarget {
    /// 32-bit float
    Float,
    /// 32-bit signed integer
    Integer,
    /// Calendar date in strict `YYYY-MM-DD` form
    Date,
}

impl fmt::Display for CastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "Float32",
            Self::Integer => "Int32",
            Self::Date => "Date",
        };
        f.write_str(name)
    }
}

/// An explicit cast applied to one column after name normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCast {
    /// Normalized column name.
    pub column: String,
    /// Type the column is cast to.
    pub target: CastTarget,
}

impl ColumnCast {
    pub fn new(column: impl Into<String>, target: CastTarget) -> Self {
        Self {
            column: column.into(),
            target,
        }
    }
}

/// The casts the genomic dataset needs.
pub fn default_column_casts() -> Vec<ColumnCast> {
    vec![
        ColumnCast::new("gene_expression", CastTarget::Float),
        ColumnCast::new("mutation_id", CastTarget::Integer),
        ColumnCast::new("date", CastTarget::Date),
    ]
}

/// Configuration for the transform pipeline.
///
/// Use [`TransformConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use genome_transform::config::{CastFailurePolicy, TransformConfig};
///
/// let config = TransformConfig::builder()
///     .cast_failure_policy(CastFailurePolicy::Fail)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Whether to drop rows containing any null value.
    /// Default: true
    pub drop_null_rows: bool,

    /// Whether to remove exact duplicate rows.
    /// Default: true
    pub remove_duplicates: bool,

    /// Handling of values that fail to cast.
    /// Default: DropRows
    pub cast_failure_policy: CastFailurePolicy,

    /// Explicit casts, keyed by normalized column name.
    /// Default: gene_expression -> Float, mutation_id -> Integer, date -> Date
    pub column_casts: Vec<ColumnCast>,

    /// Normalized column that is lower-cased and used as the partition key.
    /// Default: "cancer_type"
    pub partition_column: String,

    /// Value written for a null partition key.
    /// Default: "unknown"
    pub unknown_category: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            drop_null_rows: true,
            remove_duplicates: true,
            cast_failure_policy: CastFailurePolicy::default(),
            column_casts: default_column_casts(),
            partition_column: DEFAULT_PARTITION_COLUMN.to_string(),
            unknown_category: DEFAULT_UNKNOWN_CATEGORY.to_string(),
        }
    }
}

impl TransformConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Fields missing from the file take their default values.
    pub fn from_json_file(path: &Path) -> crate::error::Result<Self> {
        let text = fs::read_to_string(path)
            .context(format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)?;
        config
            .validate()
            .map_err(|e| TransformError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.partition_column.is_empty() {
            return Err(ConfigValidationError::EmptyField("partition_column"));
        }
        if self.unknown_category.is_empty() {
            return Err(ConfigValidationError::EmptyField("unknown_category"));
        }
        if normalize_column_name(&self.partition_column) != self.partition_column {
            return Err(ConfigValidationError::NotNormalized(
                self.partition_column.clone(),
            ));
        }

        let mut seen = HashSet::new();
        for cast in &self.column_casts {
            if normalize_column_name(&cast.column) != cast.column {
                return Err(ConfigValidationError::NotNormalized(cast.column.clone()));
            }
            if !seen.insert(cast.column.as_str()) {
                return Err(ConfigValidationError::DuplicateCast(cast.column.clone()));
            }
            if cast.column == self.partition_column {
                return Err(ConfigValidationError::PartitionColumnCast(
                    cast.column.clone(),
                ));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Column name '{0}' is not in normalized form (trimmed, lower-case, underscores)")]
    NotNormalized(String),

    #[error("Column '{0}' has more than one cast")]
    DuplicateCast(String),

    #[error("Partition column '{0}' cannot be cast")]
    PartitionColumnCast(String),
}

/// Builder for [`TransformConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct TransformConfigBuilder {
    drop_null_rows: Option<bool>,
    remove_duplicates: Option<bool>,
    cast_failure_policy: Option<CastFailurePolicy>,
    column_casts: Option<Vec<ColumnCast>>,
    partition_column: Option<String>,
    unknown_category: Option<String>,
}

impl TransformConfigBuilder {
    /// Enable or disable dropping rows that contain a null.
    pub fn drop_null_rows(mut self, drop: bool) -> Self {
        self.drop_null_rows = Some(drop);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set how cast failures are handled.
    pub fn cast_failure_policy(mut self, policy: CastFailurePolicy) -> Self {
        self.cast_failure_policy = Some(policy);
        self
    }

    /// Replace the default column casts.
    pub fn column_casts(mut self, casts: Vec<ColumnCast>) -> Self {
        self.column_casts = Some(casts);
        self
    }

    /// Set the partition column (normalized name).
    pub fn partition_column(mut self, column: impl Into<String>) -> Self {
        self.partition_column = Some(column.into());
        self
    }

    /// Set the literal used for null partition values.
    pub fn unknown_category(mut self, value: impl Into<String>) -> Self {
        self.unknown_category = Some(value.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `TransformConfig` or an error if validation fails.
    pub fn build(self) -> Result<TransformConfig, ConfigValidationError> {
        let config = TransformConfig {
            drop_null_rows: self.drop_null_rows.unwrap_or(true),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            cast_failure_policy: self.cast_failure_policy.unwrap_or_default(),
            column_casts: self.column_casts.unwrap_or_else(default_column_casts),
            partition_column: self
                .partition_column
                .unwrap_or_else(|| DEFAULT_PARTITION_COLUMN.to_string()),
            unknown_category: self
                .unknown_category
                .unwrap_or_else(|| DEFAULT_UNKNOWN_CATEGORY.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransformConfig::default();
        assert!(config.drop_null_rows);
        assert!(config.remove_duplicates);
        assert_eq!(config.cast_failure_policy, CastFailurePolicy::DropRows);
        assert_eq!(config.partition_column, "cancer_type");
        assert_eq!(config.unknown_category, "unknown");
        assert_eq!(config.column_casts.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = TransformConfig::builder()
            .drop_null_rows(false)
            .remove_duplicates(false)
            .cast_failure_policy(CastFailurePolicy::Keep)
            .unknown_category("unclassified")
            .build()
            .unwrap();

        assert!(!config.drop_null_rows);
        assert!(!config.remove_duplicates);
        assert_eq!(config.cast_failure_policy, CastFailurePolicy::Keep);
        assert_eq!(config.unknown_category, "unclassified");
    }

    #[test]
    fn test_validation_rejects_unnormalized_partition_column() {
        let result = TransformConfig::builder()
            .partition_column("Cancer Type")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NotNormalized(_)
        ));
    }

    #[test]
    fn test_validation_rejects_duplicate_cast() {
        let result = TransformConfig::builder()
            .column_casts(vec![
                ColumnCast::new("date", CastTarget::Date),
                ColumnCast::new("date", CastTarget::Integer),
            ])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::DuplicateCast(_)
        ));
    }

    #[test]
    fn test_validation_rejects_cast_on_partition_column() {
        let result = TransformConfig::builder()
            .column_casts(vec![ColumnCast::new("cancer_type", CastTarget::Integer)])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::PartitionColumnCast(_)
        ));
    }

    #[test]
    fn test_validation_rejects_empty_unknown_category() {
        let result = TransformConfig::builder().unknown_category("").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyField("unknown_category")
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "drop_null_rows": true,
            "remove_duplicates": false,
            "cast_failure_policy": "Fail",
            "column_casts": [{"column": "gene_expression", "target": "Float"}],
            "partition_column": "cancer_type",
            "unknown_category": "unknown"
        }"#;

        let config: TransformConfig = serde_json::from_str(json).expect("Should deserialize");
        assert!(!config.remove_duplicates);
        assert_eq!(config.cast_failure_policy, CastFailurePolicy::Fail);
        assert_eq!(
            config.column_casts,
            vec![ColumnCast::new("gene_expression", CastTarget::Float)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_uses_defaults_for_missing_fields() {
        let config: TransformConfig =
            serde_json::from_str(r#"{"cast_failure_policy": "Keep"}"#).unwrap();
        assert_eq!(config.cast_failure_policy, CastFailurePolicy::Keep);
        assert_eq!(config.column_casts, default_column_casts());
        assert!(config.drop_null_rows);
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transform.json");
        fs::write(&path, r#"{"unknown_category": "unclassified"}"#).unwrap();

        let config = TransformConfig::from_json_file(&path).unwrap();
        assert_eq!(config.unknown_category, "unclassified");
    }

    #[test]
    fn test_config_from_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = TransformConfig::from_json_file(&dir.path().join("none.json")).unwrap_err();
        assert_eq!(missing.error_code(), "IO_ERROR");

        let bad_json = dir.path().join("bad.json");
        fs::write(&bad_json, "{").unwrap();
        let err = TransformConfig::from_json_file(&bad_json).unwrap_err();
        assert_eq!(err.error_code(), "JSON_ERROR");

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{"partition_column": "Cancer Type"}"#).unwrap();
        let err = TransformConfig::from_json_file(&invalid).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_cast_target_display() {
        assert_eq!(CastTarget::Float.to_string(), "Float32");
        assert_eq!(CastTarget::Integer.to_string(), "Int32");
        assert_eq!(CastTarget::Date.to_string(), "Date");
    }
}
