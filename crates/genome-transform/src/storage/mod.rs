//! Dataset storage abstraction.
//!
//! The pipeline never touches files directly: it receives a [`DatasetStore`]
//! and asks it to read the raw table and to write the partitioned result.
//! This keeps the transformation steps independent of where the data lives.
//!
//! # Implementing a New Store
//!
//! 1. Create a new file in `src/storage/` (e.g., `object_store.rs`)
//! 2. Implement the [`DatasetStore`] trait
//! 3. Export it in this module
//!
//! [`LocalDatasetStore`] is the filesystem implementation.

mod local;
pub mod partition;

pub use local::{LocalDatasetStore, PART_FILE_NAME, SUCCESS_MARKER};
pub use partition::{escape_partition_value, partition_dir_name};

use crate::error::Result;
use crate::types::PartitionSummary;
use polars::prelude::*;
use std::path::Path;

/// Reads raw tables and writes partitioned output.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared by the
/// job entry point and the pipeline.
pub trait DatasetStore: Send + Sync {
    /// Read a CSV table (header row, every column as string).
    ///
    /// # Errors
    ///
    /// Returns an error if the location does not exist or cannot be parsed.
    fn read_table(&self, location: &Path) -> Result<DataFrame>;

    /// Replace whatever is at `destination` with `df` partitioned by
    /// `partition_column`.
    ///
    /// # Errors
    ///
    /// Returns an error if `partition_column` is missing or any write fails.
    /// A failed write may leave the destination partially replaced.
    fn write_partitioned(
        &self,
        df: &DataFrame,
        destination: &Path,
        partition_column: &str,
    ) -> Result<Vec<PartitionSummary>>;

    /// Store name for logging.
    fn name(&self) -> &str;
}
