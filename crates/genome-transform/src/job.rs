//! Job lifecycle: resolved arguments, run identity and completion logging.

use crate::error::{Result, TransformError};
use crate::types::TransformSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{Span, info, info_span};

/// Arguments the job platform resolves for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobArguments {
    /// Raw CSV file or directory of CSV files.
    pub input_path: PathBuf,
    /// Destination of the partitioned Parquet dataset.
    pub output_path: PathBuf,
}

/// A started job run.
///
/// Every log line emitted inside [`JobContext::run`] carries the job name
/// and run id.
#[derive(Debug)]
pub struct JobContext {
    job_name: String,
    run_id: String,
    started_at: DateTime<Utc>,
    args: JobArguments,
    span: Span,
}

impl JobContext {
    /// Start a run of `job_name` with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidConfig`] if the job name or either
    /// path is empty.
    pub fn init(job_name: impl Into<String>, args: JobArguments) -> Result<Self> {
        let job_name = job_name.into();
        if job_name.trim().is_empty() {
            return Err(TransformError::InvalidConfig(
                "Job name must not be empty".to_string(),
            ));
        }
        if args.input_path.as_os_str().is_empty() {
            return Err(TransformError::InvalidConfig(
                "Input path must not be empty".to_string(),
            ));
        }
        if args.output_path.as_os_str().is_empty() {
            return Err(TransformError::InvalidConfig(
                "Output path must not be empty".to_string(),
            ));
        }

        let started_at = Utc::now();
        let run_id = started_at.format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let span = info_span!("job", name = %job_name, run_id = %run_id);

        span.in_scope(|| {
            info!("Job initialized");
            info!("  input:  {}", args.input_path.display());
            info!("  output: {}", args.output_path.display());
        });

        Ok(Self {
            job_name,
            run_id,
            started_at,
            args,
            span,
        })
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn args(&self) -> &JobArguments {
        &self.args
    }

    /// Run `f` inside the job's tracing span.
    pub fn run<T>(&self, f: impl FnOnce(&JobArguments) -> T) -> T {
        self.span.in_scope(|| f(&self.args))
    }

    /// Mark the run as finished.
    pub fn commit(self, summary: &TransformSummary) {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        self.span.in_scope(|| {
            info!(
                "Job committed: {} rows read, {} rows written, {} partitions ({} ms)",
                summary.rows_read,
                summary.rows_written,
                summary.partitions.len(),
                elapsed.num_milliseconds()
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> JobArguments {
        JobArguments {
            input_path: PathBuf::from("raw/tcga.csv"),
            output_path: PathBuf::from("processed"),
        }
    }

    #[test]
    fn test_init_sets_identity() {
        let job = JobContext::init("tcga-transform", args()).unwrap();
        assert_eq!(job.job_name(), "tcga-transform");
        assert!(job.run_id().ends_with('Z'));
        assert_eq!(job.args().output_path, PathBuf::from("processed"));
    }

    #[test]
    fn test_init_rejects_empty_job_name() {
        let err = JobContext::init("  ", args()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_init_rejects_empty_paths() {
        let missing_output = JobArguments {
            output_path: PathBuf::new(),
            ..args()
        };
        assert!(JobContext::init("job", missing_output).is_err());
    }

    #[test]
    fn test_run_passes_arguments() {
        let job = JobContext::init("job", args()).unwrap();
        let input = job.run(|args| args.input_path.clone());
        assert_eq!(input, PathBuf::from("raw/tcga.csv"));
        job.commit(&TransformSummary::new());
    }
}
