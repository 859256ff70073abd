//! Error types for the genomic transform pipeline.
//!
//! Every failure aborts the whole run: the pipeline has no partial-success
//! mode, so these errors are propagated to the job entry point unchanged.
//! Errors serialize as `{code, message}` for machine-readable job output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the transform pipeline.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Input location does not exist.
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input location exists but holds no readable CSV data.
    #[error("No CSV files found at {}", .0.display())]
    EmptyInput(PathBuf),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Two or more source columns normalize to the same name.
    #[error("Columns {sources:?} all normalize to '{normalized}'")]
    SchemaConflict {
        normalized: String,
        sources: Vec<String>,
    },

    /// Values failed to parse under the `Fail` cast policy.
    #[error("{count} value(s) in column '{column}' could not be cast to {target_type}")]
    CastFailed {
        column: String,
        target_type: String,
        count: usize,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Partitioned output could not be written.
    #[error("Failed to write output to {}: {reason}", .path.display())]
    WriteFailed { path: PathBuf, reason: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TransformError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for job status reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::SchemaConflict { .. } => "SCHEMA_CONFLICT",
            Self::CastFailed { .. } => "CAST_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error comes from the data itself rather than the environment.
    ///
    /// Data errors will fail again on rerun with the same input; environment
    /// errors (IO, missing input) may not.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::SchemaConflict { .. } | Self::CastFailed { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl Serialize for TransformError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("TransformError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TransformError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TransformError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            TransformError::ColumnNotFound("date".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        let conflict = TransformError::SchemaConflict {
            normalized: "cancer_type".to_string(),
            sources: vec!["Cancer Type".to_string(), "cancer_type".to_string()],
        };
        assert_eq!(conflict.error_code(), "SCHEMA_CONFLICT");
    }

    #[test]
    fn test_is_data_error() {
        assert!(TransformError::ColumnNotFound("x".to_string()).is_data_error());
        assert!(
            TransformError::CastFailed {
                column: "date".to_string(),
                target_type: "Date".to_string(),
                count: 2,
            }
            .is_data_error()
        );
        assert!(!TransformError::InputNotFound(PathBuf::from("missing.csv")).is_data_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = TransformError::ColumnNotFound("mutation_id".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("mutation_id"));
    }

    #[test]
    fn test_with_context() {
        let error = TransformError::ColumnNotFound("date".to_string())
            .with_context("During type coercion");
        assert!(error.to_string().contains("During type coercion"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_data_error());
    }

    #[test]
    fn test_schema_conflict_message_lists_sources() {
        let error = TransformError::SchemaConflict {
            normalized: "gene_id".to_string(),
            sources: vec!["Gene ID".to_string(), "gene id".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("Gene ID"));
        assert!(message.contains("gene_id"));
    }
}
