//! Wiring of the review sync job: CSV reader, review transformer and
//! uploader, driven by a single chunk-oriented step.

use std::time::Duration;

use log::info;

use crate::{
    config::SyncConfig,
    core::{
        item::ItemWriter,
        job::{Job, JobBuilder, JobExecution},
        step::{ChunkOrientedStep, StepBuilder, StepExecution},
    },
    error::BatchError,
    item::{
        csv::csv_reader::CsvItemReaderBuilder,
        logger::LoggerWriter,
        review::{Document, ReviewDocumentProcessor, ReviewRow},
        sync::{ErrorDump, SyncRawEmailsWriterBuilder, Transport},
    },
};

const JOB_NAME: &str = "hotel-review-sync";
const STEP_NAME: &str = "upload-reviews";

/// Outcome of a completed run.
#[derive(Debug)]
pub struct SyncSummary {
    pub job: JobExecution,
    /// Requests sent to the API
    pub upload_count: usize,
    /// Documents the API accepted
    pub uploaded_documents: usize,
    /// Batches the API rejected, saved to the errors folder
    pub failed_batches: usize,
}

impl SyncSummary {
    /// Execution of the upload step.
    pub fn step(&self) -> Option<&StepExecution> {
        self.job.step_executions.first()
    }

    pub fn duration(&self) -> Duration {
        self.job.duration
    }

    /// Logs row and upload counts at `info` level.
    pub fn log(&self) {
        if let Some(step) = self.step() {
            info!(
                "Read {} rows, transformed {}, skipped {}",
                step.read_count,
                step.process_count,
                step.read_error_count + step.process_error_count
            );
        }
        info!(
            "Sent {} requests: {} documents accepted, {} batches rejected, in {:?}",
            self.upload_count,
            self.uploaded_documents,
            self.failed_batches,
            self.duration()
        );
    }
}

/// Reads the configured CSV export and uploads its reviews through
/// `transport`.
pub fn sync_reviews<T: Transport>(
    config: &SyncConfig,
    transport: T,
) -> Result<SyncSummary, BatchError> {
    config.validate()?;

    let writer = SyncRawEmailsWriterBuilder::new()
        .endpoint(config.endpoint())
        .token(config.token.as_str())
        .transform_tag(config.transform_tag.as_str())
        .error_dump(ErrorDump::new(&config.errors_folder))
        .build(transport);

    let job = run_job(config, &writer)?;

    Ok(SyncSummary {
        job,
        upload_count: writer.upload_count(),
        uploaded_documents: writer.uploaded_documents(),
        failed_batches: writer.failed_batches(),
    })
}

/// Runs the whole pipeline but logs documents instead of uploading them.
pub fn dry_run(config: &SyncConfig) -> Result<SyncSummary, BatchError> {
    config.validate()?;

    let job = run_job(config, &LoggerWriter)?;

    Ok(SyncSummary {
        job,
        upload_count: 0,
        uploaded_documents: 0,
        failed_batches: 0,
    })
}

fn run_job<W: ItemWriter<Document>>(
    config: &SyncConfig,
    writer: &W,
) -> Result<JobExecution, BatchError> {
    let reader = CsvItemReaderBuilder::new()
        .field_count(ReviewRow::FIELD_COUNT)
        .from_path(&config.input)?;
    let processor = ReviewDocumentProcessor;

    let step: ChunkOrientedStep<ReviewRow, Document> = StepBuilder::new()
        .name(STEP_NAME.to_string())
        .reader(&reader)
        .processor(&processor)
        .writer(writer)
        .chunk(config.batch_size)
        .skip_limit(config.skip_limit)
        .progress_interval(config.progress_interval)
        .build();

    let job = JobBuilder::new()
        .name(JOB_NAME.to_string())
        .start(&step)
        .build();

    job.run()
}
