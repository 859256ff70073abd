//! Progress reporting for the transform pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use genome_transform::{LocalDatasetStore, Pipeline};
//!
//! let summary = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&LocalDatasetStore::new(), input, output)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the transform pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStage {
    /// Pipeline is starting
    Initializing,
    /// Reading the raw table
    Reading,
    /// Dropping rows that contain a null
    NullFiltering,
    /// Dropping exact duplicate rows
    Deduplication,
    /// Normalizing column names
    NameNormalization,
    /// Casting columns to their target types
    TypeCoercion,
    /// Lower-casing the partition column
    CategoricalNormalization,
    /// Writing partitioned output
    Writing,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl TransformStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Reading => "Reading Input",
            Self::NullFiltering => "Filtering Nulls",
            Self::Deduplication => "Removing Duplicates",
            Self::NameNormalization => "Normalizing Names",
            Self::TypeCoercion => "Casting Types",
            Self::CategoricalNormalization => "Normalizing Categories",
            Self::Writing => "Writing Output",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the weight of this stage in the overall run (0.0 - 1.0).
    ///
    /// Weights of the non-terminal stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::Reading => 0.18,
            Self::NullFiltering => 0.10,
            Self::Deduplication => 0.10,
            Self::NameNormalization => 0.05,
            Self::TypeCoercion => 0.20,
            Self::CategoricalNormalization => 0.05,
            Self::Writing => 0.30,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Reading => 0.02,
            Self::NullFiltering => 0.20,
            Self::Deduplication => 0.30,
            Self::NameNormalization => 0.40,
            Self::TypeCoercion => 0.45,
            Self::CategoricalNormalization => 0.65,
            Self::Writing => 0.70,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: TransformStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: TransformStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: TransformStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: TransformStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` so that a job runner can observe a
/// pipeline executing on another thread.
pub trait ProgressReporter: Send + Sync {
    /// Called at the start (`stage_progress` 0.0) and end (1.0) of every
    /// stage that runs. Disabled steps report nothing.
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
