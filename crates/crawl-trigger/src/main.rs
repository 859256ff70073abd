//! CLI entry point for the crawl trigger.

use anyhow::{Context, Result};
use clap::Parser;
use crawl_trigger::{
    DEFAULT_CRAWLER_NAME, HttpCrawlerConfig, HttpCrawlerService, S3Event, TriggerConfig,
    TriggerError, TriggerHandler, TriggerResult,
};
use dotenv::dotenv;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Start the catalog crawler for an object-created notification",
    long_about = "Reads a notification batch, starts the catalog crawler once, and prints \
                  the {statusCode, body} response as JSON.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  CRAWLER_NAME         Crawler to start (default tcga_data_crawler)\n  \
                  CRAWLER_ENDPOINT     Base URL of the crawler control endpoint\n  \
                  CRAWLER_API_TOKEN    Bearer token for the control endpoint\n\n\
                  EXAMPLES:\n  \
                  crawl-trigger --event event.json\n\n  \
                  cat event.json | crawl-trigger --event -"
)]
struct Args {
    /// Notification JSON file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    event: String,

    /// Crawler to start
    #[arg(long, env = "CRAWLER_NAME", default_value = DEFAULT_CRAWLER_NAME)]
    crawler_name: String,

    /// Base URL of the crawler control endpoint
    #[arg(long, env = "CRAWLER_ENDPOINT")]
    endpoint: String,

    /// Bearer token for the control endpoint
    #[arg(long, env = "CRAWLER_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the response JSON.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the event from stdin (`-`) or a file.
///
/// Only a missing file aborts the process; other read and parse errors are
/// reported through the handler response.
fn read_event(source: &str) -> Result<TriggerResult<S3Event>> {
    let event = if source == "-" {
        let mut payload = String::new();
        std::io::stdin()
            .read_to_string(&mut payload)
            .context("Failed to read event from stdin")?;
        debug!("Read {} bytes of event payload", payload.len());
        S3Event::from_json(&payload)
    } else {
        S3Event::from_path(Path::new(source))
    };

    match event {
        Err(e @ TriggerError::EventNotFound(_)) => Err(e.into()),
        event => Ok(event),
    }
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = TriggerConfig::builder()
        .crawler_name(&args.crawler_name)
        .build()?;

    let mut service_config = HttpCrawlerConfig::builder().base_url(&args.endpoint);
    if let Some(token) = &args.api_token {
        service_config = service_config.api_token(token);
    }
    if let Some(timeout) = args.timeout_secs {
        service_config = service_config.timeout_secs(timeout);
    }
    let service = HttpCrawlerService::with_config(service_config.build())?;

    let handler = TriggerHandler::new(config, Arc::new(service))?;

    let response = handler.handle_parsed(read_event(&args.event)?);
    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
