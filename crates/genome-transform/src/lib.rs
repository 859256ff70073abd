//! Genomic Dataset Transform Library
//!
//! Cleans a raw cancer-genomics CSV table and writes it back out as a
//! Parquet dataset partitioned by cancer type.
//!
//! # Overview
//!
//! The pipeline runs these steps in order:
//!
//! - **Null Filtering**: Drop every row with a null in any column
//! - **Deduplication**: Keep one copy of each fully identical row
//! - **Name Normalization**: Trim, lower-case and underscore column names
//! - **Type Coercion**: `gene_expression` to Float32, `mutation_id` to Int32, `date` to Date
//! - **Categorical Normalization**: Lower-case `cancer_type`, nulls become `"unknown"`
//! - **Partitioned Write**: Overwrite the destination with one directory per cancer type
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use genome_transform::{LocalDatasetStore, Pipeline};
//! use std::path::Path;
//!
//! let summary = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(
//!         &LocalDatasetStore::new(),
//!         Path::new("raw/tcga.csv"),
//!         Path::new("processed"),
//!     )?;
//!
//! for (cancer_type, rows) in summary.partition_counts() {
//!     println!("{cancer_type}: {rows}");
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use genome_transform::{CastFailurePolicy, TransformConfig};
//!
//! let config = TransformConfig::builder()
//!     .drop_null_rows(false)                          // keep rows, default null categories
//!     .cast_failure_policy(CastFailurePolicy::Fail)   // abort on unparseable values
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod storage;
pub mod types;

// Re-exports for convenient access
pub use cleaner::{
    CoercionReport, DataCleaner, TypeCoercer, normalize_categorical, normalize_column_name,
    normalize_column_names,
};
pub use config::{
    CastFailurePolicy, CastTarget, ColumnCast, ConfigValidationError, TransformConfig,
    TransformConfigBuilder,
};
pub use error::{Result as TransformResult, ResultExt, TransformError};
pub use job::{JobArguments, JobContext};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter, ProgressUpdate,
    TransformStage,
};
pub use storage::{DatasetStore, LocalDatasetStore};
pub use types::{PartitionSummary, TransformSummary};
