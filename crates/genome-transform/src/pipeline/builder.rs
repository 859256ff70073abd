//! Transform pipeline and builder.

use crate::cleaner::{DataCleaner, TypeCoercer, normalize_categorical, normalize_column_names};
use crate::config::{ConfigValidationError, TransformConfig};
use crate::error::Result;
use crate::pipeline::progress::{
    ClosureProgressReporter, ProgressReporter, ProgressUpdate, TransformStage,
};
use crate::storage::DatasetStore;
use crate::types::TransformSummary;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The genomic transform pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use genome_transform::{CastFailurePolicy, LocalDatasetStore, Pipeline, TransformConfig};
///
/// let config = TransformConfig::builder()
///     .cast_failure_policy(CastFailurePolicy::Keep)
///     .build()?;
///
/// let summary = Pipeline::builder()
///     .config(config)
///     .build()?
///     .run(&LocalDatasetStore::new(), "raw/".as_ref(), "processed/".as_ref())?;
/// ```
pub struct Pipeline {
    config: TransformConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    coercer: TypeCoercer,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Apply the in-memory steps (null filter through categorical
    /// normalization) to `df`.
    ///
    /// # Errors
    ///
    /// Fails on a column name collision, a missing cast or partition column,
    /// or a cast failure under [`CastFailurePolicy::Fail`](crate::config::CastFailurePolicy::Fail).
    pub fn transform(&self, df: DataFrame) -> Result<(DataFrame, TransformSummary)> {
        let start_time = Instant::now();
        let mut summary = TransformSummary::new();
        self.report_progress(ProgressUpdate::new(
            TransformStage::Initializing,
            0.0,
            "Starting transform pipeline...",
        ));

        let result = self.apply_steps(df, &mut summary);
        self.finish(result.map(|df| {
            summary.rows_written = df.height();
            summary.duration_ms = start_time.elapsed().as_millis() as u64;
            (df, summary)
        }))
    }

    /// Read `input`, transform it, and overwrite `output` with the
    /// partitioned result.
    pub fn run(
        &self,
        store: &dyn DatasetStore,
        input: &Path,
        output: &Path,
    ) -> Result<TransformSummary> {
        let result = self.run_internal(store, input, output);
        self.finish(result)
    }

    fn run_internal(
        &self,
        store: &dyn DatasetStore,
        input: &Path,
        output: &Path,
    ) -> Result<TransformSummary> {
        let start_time = Instant::now();
        let mut summary = TransformSummary::new();
        self.report_progress(ProgressUpdate::new(
            TransformStage::Initializing,
            0.0,
            "Starting transform pipeline...",
        ));

        self.report_progress(ProgressUpdate::new(
            TransformStage::Reading,
            0.0,
            format!("Reading {}", input.display()),
        ));
        info!("Reading input from {} ({} store)", input.display(), store.name());
        let df = store.read_table(input)?;
        self.report_progress(ProgressUpdate::new(
            TransformStage::Reading,
            1.0,
            format!("Read {} rows", df.height()),
        ));

        let df = self.apply_steps(df, &mut summary)?;
        summary.rows_written = df.height();

        self.report_progress(ProgressUpdate::new(
            TransformStage::Writing,
            0.0,
            format!("Writing {}", output.display()),
        ));
        info!("Writing {} rows to {}", df.height(), output.display());
        summary.partitions = store.write_partitioned(&df, output, &self.config.partition_column)?;
        self.report_progress(ProgressUpdate::new(
            TransformStage::Writing,
            1.0,
            format!("Wrote {} partitions", summary.partitions.len()),
        ));

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(summary)
    }

    fn finish<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(value)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn apply_steps(&self, df: DataFrame, summary: &mut TransformSummary) -> Result<DataFrame> {
        summary.rows_read = df.height();
        summary.columns = df.width();
        info!(
            "Starting transform: {} rows x {} columns",
            df.height(),
            df.width()
        );

        // Step 1: null filtering
        let df = if self.config.drop_null_rows {
            self.report_progress(ProgressUpdate::new(
                TransformStage::NullFiltering,
                0.0,
                "Dropping rows with nulls...",
            ));
            let (df, removed) = self.cleaner.drop_null_rows(df)?;
            summary.null_rows_removed = removed;
            info!("Step 1: Dropped {} rows containing nulls", removed);
            self.report_progress(ProgressUpdate::new(
                TransformStage::NullFiltering,
                1.0,
                format!("Dropped {} rows with nulls", removed),
            ));
            df
        } else {
            info!("Step 1: Skipping null filtering (disabled)");
            df
        };

        // Step 2: deduplication
        let df = if self.config.remove_duplicates {
            self.report_progress(ProgressUpdate::new(
                TransformStage::Deduplication,
                0.0,
                "Removing duplicate rows...",
            ));
            let (df, removed) = self.cleaner.remove_duplicates(df)?;
            summary.duplicates_removed = removed;
            info!("Step 2: Removed {} duplicate rows", removed);
            self.report_progress(ProgressUpdate::new(
                TransformStage::Deduplication,
                1.0,
                format!("Removed {} duplicate rows", removed),
            ));
            df
        } else {
            info!("Step 2: Skipping deduplication (disabled)");
            df
        };

        // Step 3: column names
        self.report_progress(ProgressUpdate::new(
            TransformStage::NameNormalization,
            0.0,
            "Normalizing column names...",
        ));
        let (df, renamed) = normalize_column_names(df)?;
        info!("Step 3: Renamed {} columns", renamed.len());
        self.report_progress(ProgressUpdate::new(
            TransformStage::NameNormalization,
            1.0,
            format!("Renamed {} columns", renamed.len()),
        ));
        summary.renamed_columns = renamed;

        // Step 4: type coercion
        self.report_progress(ProgressUpdate::new(
            TransformStage::TypeCoercion,
            0.0,
            "Casting typed columns...",
        ));
        let (df, report) = self.coercer.coerce(df)?;
        info!(
            "Step 4: Cast {} columns ({} failed values, {} rows dropped)",
            self.config.column_casts.len(),
            report.total_failures(),
            report.rows_dropped
        );
        summary.cast_failures = report.cast_failures.clone();
        self.report_progress(ProgressUpdate::new(
            TransformStage::TypeCoercion,
            1.0,
            format!("{} values failed to cast", report.total_failures()),
        ));
        summary.cast_rows_removed = report.rows_dropped;

        // Step 5: categorical normalization
        self.report_progress(ProgressUpdate::new(
            TransformStage::CategoricalNormalization,
            0.0,
            format!("Normalizing '{}'...", self.config.partition_column),
        ));
        let (df, defaulted) = normalize_categorical(
            df,
            &self.config.partition_column,
            &self.config.unknown_category,
        )?;
        summary.categories_defaulted = defaulted;
        info!(
            "Step 5: Normalized '{}' ({} defaulted to '{}')",
            self.config.partition_column, defaulted, self.config.unknown_category
        );
        self.report_progress(ProgressUpdate::new(
            TransformStage::CategoricalNormalization,
            1.0,
            format!("{} values defaulted", defaulted),
        ));

        Ok(df)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<TransformConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: TransformConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure to receive progress updates.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let coercer = TypeCoercer::new(config.column_casts.clone(), config.cast_failure_policy);

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
            coercer,
        })
    }
}
