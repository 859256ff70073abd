//! CLI entry point for the genomic transform job.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use genome_transform::{
    CastFailurePolicy, JobArguments, JobContext, LocalDatasetStore, Pipeline, TransformConfig,
    TransformSummary,
};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-compatible cast failure policy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCastFailurePolicy {
    /// Remove rows holding a value that failed to cast
    DropRows,
    /// Keep the rows with the failed value set to null
    Keep,
    /// Abort the job on the first failed column
    Fail,
}

impl From<CliCastFailurePolicy> for CastFailurePolicy {
    fn from(cli: CliCastFailurePolicy) -> Self {
        match cli {
            CliCastFailurePolicy::DropRows => CastFailurePolicy::DropRows,
            CliCastFailurePolicy::Keep => CastFailurePolicy::Keep,
            CliCastFailurePolicy::Fail => CastFailurePolicy::Fail,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Genomic dataset transform job",
    long_about = "Cleans a raw genomic CSV dataset and overwrites the output with a \
                  Parquet dataset partitioned by cancer_type.\n\n\
                  EXAMPLES:\n  \
                  genome-transform --JOB_NAME tcga --INPUT_PATH raw/tcga.csv --OUTPUT_PATH processed/\n\n  \
                  # Keep rows whose values fail to cast\n  \
                  genome-transform --job-name tcga --input raw/ --output processed/ --cast-failure-policy keep"
)]
struct Args {
    /// Name of the job run
    #[arg(long = "JOB_NAME", visible_alias = "job-name", env = "JOB_NAME")]
    job_name: String,

    /// CSV file, or directory of CSV files, to read
    #[arg(long = "INPUT_PATH", visible_alias = "input", env = "INPUT_PATH")]
    input_path: PathBuf,

    /// Destination directory, replaced on every run
    #[arg(long = "OUTPUT_PATH", visible_alias = "output", env = "OUTPUT_PATH")]
    output_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print the run summary as JSON to stdout
    ///
    /// Disables all logs so stdout only carries the summary.
    #[arg(long)]
    json: bool,

    /// JSON file with pipeline settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How to handle values that fail to cast [default: drop-rows]
    #[arg(long, value_enum)]
    cast_failure_policy: Option<CliCastFailurePolicy>,

    /// Keep rows that contain a null
    #[arg(long)]
    keep_null_rows: bool,

    /// Keep exact duplicate rows
    #[arg(long)]
    keep_duplicates: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled entirely.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // .env may carry RUST_LOG and the job parameters
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let mut config = match &args.config {
        Some(path) => TransformConfig::from_json_file(path)?,
        None => TransformConfig::default(),
    };
    if args.keep_null_rows {
        config.drop_null_rows = false;
    }
    if args.keep_duplicates {
        config.remove_duplicates = false;
    }
    if let Some(policy) = args.cast_failure_policy {
        config.cast_failure_policy = policy.into();
    }

    let job = JobContext::init(
        &args.job_name,
        JobArguments {
            input_path: args.input_path.clone(),
            output_path: args.output_path.clone(),
        },
    )?;

    let pipeline = Pipeline::builder().config(config).build()?;
    let store = LocalDatasetStore::new();

    let summary = match job.run(|paths| pipeline.run(&store, &paths.input_path, &paths.output_path))
    {
        Ok(summary) => summary,
        Err(e) => {
            error!("Job {} failed [{}]: {}", job.job_name(), e.error_code(), e);
            if e.is_data_error() {
                error!("The input data must be corrected before rerunning");
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    job.commit(&summary);
    Ok(())
}

fn print_summary(summary: &TransformSummary) {
    info!("{}", "=".repeat(60));
    info!("TRANSFORM SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Rows read:              {}", summary.rows_read);
    info!("Null rows removed:      {}", summary.null_rows_removed);
    info!("Duplicates removed:     {}", summary.duplicates_removed);
    for (column, count) in &summary.cast_failures {
        info!("Cast failures in {}: {}", column, count);
    }
    info!("Rows removed by casts:  {}", summary.cast_rows_removed);
    info!("Categories defaulted:   {}", summary.categories_defaulted);
    info!(
        "Rows written:           {} ({:.1}% removed)",
        summary.rows_written,
        summary.rows_removed_percentage()
    );
    for partition in &summary.partitions {
        info!(
            "  {} rows -> {}",
            partition.rows,
            partition.path.display()
        );
    }
    info!("Duration:               {} ms", summary.duration_ms);
}
