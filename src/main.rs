use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use hotel_review_sync::{
    config::{DEFAULT_BATCH_SIZE, DEFAULT_INPUT, SyncConfig},
    core::step::DEFAULT_PROGRESS_INTERVAL,
    item::sync::{DEFAULT_ERRORS_FOLDER, DEFAULT_TRANSFORM_TAG, HttpTransport},
    pipeline::{dry_run, sync_reviews},
};

/// Upload a hotel review CSV export as raw email documents.
#[derive(Parser, Debug)]
#[command(name = "hotel-review-sync", version, about)]
struct Cli {
    /// CSV export to read; its first row is a header and is skipped.
    #[arg(long, env = "HOTEL_SYNC_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Tenant base URL, e.g. https://cloud.example.com/<org>/<tenant>/reinfer_
    #[arg(long, env = "REINFER_BASE_URL", default_value = "")]
    base_url: String,

    /// Target source as <project>/<source>.
    #[arg(long, env = "REINFER_SOURCE", default_value = "")]
    source: String,

    /// API token.
    #[arg(long, env = "REINFER_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Documents per upload request.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Folder receiving batches the API rejected.
    #[arg(long, default_value = DEFAULT_ERRORS_FOLDER)]
    errors_folder: PathBuf,

    #[arg(long, default_value = DEFAULT_TRANSFORM_TAG)]
    transform_tag: String,

    /// Rows between two progress messages.
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_interval: usize,

    /// Bad rows to skip before aborting; 0 aborts on the first one.
    #[arg(long, default_value_t = 0)]
    skip_limit: usize,

    /// Request timeout in seconds. Waits indefinitely when absent.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log the documents instead of uploading them.
    #[arg(long)]
    dry_run: bool,
}

impl From<Cli> for SyncConfig {
    fn from(cli: Cli) -> Self {
        SyncConfig {
            input: cli.input,
            base_url: cli.base_url,
            source: cli.source,
            token: cli.token,
            batch_size: cli.batch_size,
            errors_folder: cli.errors_folder,
            transform_tag: cli.transform_tag,
            progress_interval: cli.progress_interval,
            skip_limit: cli.skip_limit,
            timeout: cli.timeout_secs.map(Duration::from_secs),
            dry_run: cli.dry_run,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = SyncConfig::from(Cli::parse());

    let summary = if config.dry_run {
        dry_run(&config)
    } else {
        let transport = HttpTransport::new(config.timeout)?;
        sync_reviews(&config, transport)
    }
    .with_context(|| format!("sync of {} failed", config.input.display()))?;

    summary.log();

    Ok(())
}
