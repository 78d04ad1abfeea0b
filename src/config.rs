//! Run configuration.

use std::{path::PathBuf, time::Duration};

use crate::{
    core::step::DEFAULT_PROGRESS_INTERVAL,
    error::BatchError,
    item::sync::{DEFAULT_ERRORS_FOLDER, DEFAULT_TRANSFORM_TAG},
};

/// Path of the review export, relative to the working directory.
pub const DEFAULT_INPUT: &str = "sources/dataset.csv";

/// Documents per upload request.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Everything a sync run needs to know.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// CSV export to read.
    pub input: PathBuf,
    /// Tenant base URL, e.g. `https://cloud.example.com/org/tenant/reinfer_`.
    pub base_url: String,
    /// `<project>/<source>` identifier of the target source.
    pub source: String,
    /// API token sent as a bearer token.
    pub token: String,
    /// Documents per upload request.
    pub batch_size: usize,
    /// Folder receiving batches the API rejected.
    pub errors_folder: PathBuf,
    /// Tag telling the API how to interpret the documents.
    pub transform_tag: String,
    /// Rows between two progress messages.
    pub progress_interval: usize,
    /// Bad rows tolerated before the run aborts; 0 aborts on the first one.
    pub skip_limit: usize,
    /// `None` waits for the API indefinitely.
    pub timeout: Option<Duration>,
    /// Log documents instead of uploading them.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            base_url: String::new(),
            source: String::new(),
            token: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            errors_folder: PathBuf::from(DEFAULT_ERRORS_FOLDER),
            transform_tag: DEFAULT_TRANSFORM_TAG.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            skip_limit: 0,
            timeout: None,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// URL of the `sync-raw-emails` endpoint for the configured source.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/v1/sources/{}/sync-raw-emails",
            self.base_url.strip_suffix('/').unwrap_or(&self.base_url),
            self.source
        )
    }

    /// Rejects settings the run cannot work with.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.batch_size == 0 {
            return Err(BatchError::Configuration(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(BatchError::Configuration(
                "progress interval must be at least 1".to_string(),
            ));
        }
        if self.dry_run {
            return Ok(());
        }
        if self.base_url.trim().is_empty() {
            return Err(BatchError::Configuration("base URL is missing".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(BatchError::Configuration("source is missing".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(BatchError::Configuration("API token is missing".to_string()));
        }
        Ok(())
    }
}
