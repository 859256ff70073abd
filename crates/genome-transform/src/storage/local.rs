//! Local filesystem dataset store.

use super::DatasetStore;
use super::partition::partition_dir_name;
use crate::error::{Result, ResultExt, TransformError};
use crate::types::PartitionSummary;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File written inside every partition directory.
pub const PART_FILE_NAME: &str = "part-00000.snappy.parquet";

/// Marker written to the destination root once all partitions are in place.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Reads CSV from and writes Parquet to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDatasetStore;

static_assertions::assert_impl_all!(LocalDatasetStore: Send, Sync);

impl LocalDatasetStore {
    pub fn new() -> Self {
        Self
    }

    fn read_csv(path: &Path) -> Result<DataFrame> {
        debug!("Reading CSV: {}", path.display());
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .context(format!("Failed to open {}", path.display()))?
            .finish()
            .context(format!("Failed to parse {}", path.display()))
    }

    /// CSV files directly inside `dir`, sorted by name.
    fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).context(format!("Failed to list {}", dir.display()))? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn staging_dir(destination: &Path) -> Result<PathBuf> {
        let name = destination.file_name().ok_or_else(|| {
            TransformError::InvalidConfig(format!(
                "Output path has no final component: {}",
                destination.display()
            ))
        })?;
        let staging_name = format!(".{}.staging", name.to_string_lossy());
        Ok(match destination.parent() {
            Some(parent) => parent.join(staging_name),
            None => PathBuf::from(staging_name),
        })
    }

    fn write_partition(df: &DataFrame, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).context(format!("Failed to create {}", dir.display()))?;
        let file_path = dir.join(PART_FILE_NAME);
        let mut file =
            File::create(&file_path).context(format!("Failed to create {}", file_path.display()))?;
        let mut df = df.clone();
        ParquetWriter::new(&mut file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map_err(|e| TransformError::WriteFailed {
                path: file_path.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Swap the staged output into place, removing any previous output.
    fn commit(staging: &Path, destination: &Path) -> Result<()> {
        if destination.is_dir() {
            fs::remove_dir_all(destination)
                .context(format!("Failed to remove {}", destination.display()))?;
        } else if destination.exists() {
            fs::remove_file(destination)
                .context(format!("Failed to remove {}", destination.display()))?;
        }
        fs::rename(staging, destination).map_err(|e| TransformError::WriteFailed {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl DatasetStore for LocalDatasetStore {
    fn read_table(&self, location: &Path) -> Result<DataFrame> {
        if !location.exists() {
            return Err(TransformError::InputNotFound(location.to_path_buf()));
        }

        if !location.is_dir() {
            return Self::read_csv(location);
        }

        let files = Self::csv_files(location)?;
        let Some((first, rest)) = files.split_first() else {
            return Err(TransformError::EmptyInput(location.to_path_buf()));
        };

        let mut df = Self::read_csv(first)?;
        for path in rest {
            let next = Self::read_csv(path)?;
            df.vstack_mut(&next)
                .context(format!("Header of {} does not match", path.display()))?;
        }
        info!(
            "Read {} CSV file(s) from {}",
            files.len(),
            location.display()
        );
        Ok(df)
    }

    fn write_partitioned(
        &self,
        df: &DataFrame,
        destination: &Path,
        partition_column: &str,
    ) -> Result<Vec<PartitionSummary>> {
        let keys = df
            .column(partition_column)
            .map_err(|_| TransformError::ColumnNotFound(partition_column.to_string()))?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let keys = keys.str()?;

        let values: BTreeSet<Option<String>> =
            keys.into_iter().map(|v| v.map(str::to_string)).collect();

        let staging = Self::staging_dir(destination)?;
        if staging.exists() {
            fs::remove_dir_all(&staging)
                .context(format!("Failed to clear {}", staging.display()))?;
        }
        fs::create_dir_all(&staging)
            .context(format!("Failed to create {}", staging.display()))?;

        let mut partitions = Vec::with_capacity(values.len());
        for value in values {
            let mask = match &value {
                Some(v) => keys.equal(v.as_str()),
                None => keys.is_null(),
            };
            let value = value.unwrap_or_default();
            let part = df.filter(&mask)?.drop(partition_column)?;
            let dir_name = partition_dir_name(partition_column, &value);

            Self::write_partition(&part, &staging.join(&dir_name))?;
            debug!("Wrote {} rows to partition {}", part.height(), dir_name);

            partitions.push(PartitionSummary {
                value,
                path: destination.join(&dir_name),
                rows: part.height(),
            });
        }

        File::create(staging.join(SUCCESS_MARKER)).context("Failed to write success marker")?;
        Self::commit(&staging, destination)?;

        info!(
            "Wrote {} partition(s) to {}",
            partitions.len(),
            destination.display()
        );
        Ok(partitions)
    }

    fn name(&self) -> &str {
        "local"
    }
}
