use std::time::{Duration, Instant};

use log::{debug, error, info};
use uuid::Uuid;

use crate::error::BatchError;

use super::{
    build_name,
    chunk::Chunk,
    item::{ItemProcessor, ItemReader, ItemWriter},
};

/// Number of rows between two progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Lifecycle state of a step run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Created, not yet executed
    Starting,
    /// Reading, processing and writing
    Started,
    /// Every row consumed and every chunk written
    Success,
    /// Aborted on a row the reader could not parse
    ReadError,
    /// Aborted on a row the processor rejected
    ProcessorError,
    /// Aborted while opening, writing or closing the writer
    WriteError,
}

/// Whether reaching `row_index` deserves a progress message.
///
/// Row indices count file rows with the header as row 0, so with an interval
/// of 100 the first message comes after the 100th data row.
pub fn is_progress_row(row_index: usize, progress_interval: usize) -> bool {
    row_index != 0 && row_index % progress_interval == 0
}

/// Counters and timings of one step run.
#[derive(Debug)]
pub struct StepExecution {
    /// Unique identifier for this step run
    pub id: Uuid,
    /// Human-readable name for the step
    pub name: String,
    pub status: StepStatus,
    /// When `execute` started
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Rows successfully read, header excluded
    pub read_count: usize,
    /// Rows successfully transformed
    pub process_count: usize,
    /// Items handed to the writer without error
    pub write_count: usize,
    /// Calls made to the writer, including the final flush
    pub write_call_count: usize,
    /// Rows the reader could not parse
    pub read_error_count: usize,
    /// Rows the processor rejected
    pub process_error_count: usize,
    /// Items of chunks the writer failed on
    pub write_error_count: usize,
}

impl StepExecution {
    /// Creates an execution in the `Starting` state with all counters at zero.
    pub fn new(name: &str) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            status: StepStatus::Starting,
            start_time: now,
            end_time: now,
            duration: Duration::default(),
            read_count: 0,
            process_count: 0,
            write_count: 0,
            write_call_count: 0,
            read_error_count: 0,
            process_error_count: 0,
            write_error_count: 0,
        }
    }

    /// Index of the last consumed row in the source file, the header being row 0.
    pub fn row_index(&self) -> usize {
        self.read_count + self.read_error_count
    }

    fn error_count(&self) -> usize {
        self.read_error_count + self.process_error_count
    }
}

/// A unit of work of a job.
pub trait Step {
    /// Runs the step, recording its progress in `step_execution`.
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError>;

    /// Name used in logs and in the job's error message.
    fn get_name(&self) -> &str;
}

/// Reads rows one at a time, transforms each of them, and writes the results
/// in chunks of `chunk_size`.
///
/// Once the reader is exhausted the pending chunk is written one last time,
/// even when it is empty.
pub struct ChunkOrientedStep<'a, I, O> {
    name: String,
    reader: &'a dyn ItemReader<I>,
    processor: &'a dyn ItemProcessor<I, O>,
    writer: &'a dyn ItemWriter<O>,
    chunk_size: usize,
    /// Number of bad rows tolerated before the step fails
    skip_limit: usize,
    /// Rows between two progress messages
    progress_interval: usize,
}

impl<I, O> Step for ChunkOrientedStep<'_, I, O> {
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.start_time = start_time;
        step_execution.status = StepStatus::Started;

        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        let outcome = self
            .writer
            .open()
            .and_then(|()| self.run_chunks(step_execution))
            .and_then(|()| self.writer.close());

        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        match outcome {
            Ok(()) => {
                step_execution.status = StepStatus::Success;
                info!(
                    "End of step: {}, id: {}",
                    step_execution.name, step_execution.id
                );
                Ok(())
            }
            Err(err) => {
                if step_execution.status == StepStatus::Started {
                    step_execution.status = StepStatus::WriteError;
                }
                error!(
                    "Step {} aborted after {} rows: {}",
                    step_execution.name,
                    step_execution.row_index(),
                    err
                );
                Err(err)
            }
        }
    }

    fn get_name(&self) -> &str {
        &self.name
    }
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    fn run_chunks(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let mut chunk = Chunk::new(self.chunk_size);

        loop {
            let item = match self.reader.read() {
                Ok(Some(item)) => item,
                Ok(None) => break,
                Err(err) => {
                    step_execution.read_error_count += 1;
                    error!(
                        "Error occurred while reading row {}: {}",
                        step_execution.row_index(),
                        err
                    );
                    if self.is_skip_limit_reached(step_execution) {
                        step_execution.status = StepStatus::ReadError;
                        return Err(err);
                    }
                    continue;
                }
            };

            step_execution.read_count += 1;
            let row_index = step_execution.row_index();

            if is_progress_row(row_index, self.progress_interval) {
                info!("Processed {} rows", row_index);
            }

            match self.processor.process(&item) {
                Ok(processed) => {
                    step_execution.process_count += 1;
                    chunk.add(processed);
                }
                Err(err) => {
                    step_execution.process_error_count += 1;
                    error!("Error occurred while transforming row {}: {}", row_index, err);
                    if self.is_skip_limit_reached(step_execution) {
                        step_execution.status = StepStatus::ProcessorError;
                        return Err(err);
                    }
                }
            }

            if chunk.should_flush() {
                self.write_chunk(step_execution, &chunk.drain())?;
            }
        }

        debug!("Reader exhausted, flushing {} pending items", chunk.len());
        self.write_chunk(step_execution, &chunk.drain())
    }

    fn write_chunk(
        &self,
        step_execution: &mut StepExecution,
        items: &[O],
    ) -> Result<(), BatchError> {
        debug!("Start writing chunk of {} items", items.len());
        step_execution.write_call_count += 1;

        let result = self
            .writer
            .write(items)
            .and_then(|()| self.writer.flush());

        match result {
            Ok(()) => {
                step_execution.write_count += items.len();
                debug!("End writing chunk");
                Ok(())
            }
            Err(err) => {
                step_execution.write_error_count += items.len();
                step_execution.status = StepStatus::WriteError;
                Err(err)
            }
        }
    }

    fn is_skip_limit_reached(&self, step_execution: &StepExecution) -> bool {
        step_execution.error_count() > self.skip_limit
    }
}

/// Builder for a [`ChunkOrientedStep`].
///
/// Reader, processor and writer are required. The chunk size defaults to 1,
/// the skip limit to 0 and the progress interval to
/// [`DEFAULT_PROGRESS_INTERVAL`].
pub struct StepBuilder<'a, I, O> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: usize,
    skip_limit: usize,
    progress_interval: usize,
}

impl<I, O> Default for StepBuilder<'_, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I, O> StepBuilder<'a, I, O> {
    /// Creates a builder with the default settings.
    pub fn new() -> Self {
        Self {
            name: None,
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 1,
            skip_limit: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Sets the step name. A random one is generated otherwise.
    pub fn name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the source of items.
    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Sets the transformation applied to every item read.
    pub fn processor(mut self, processor: &'a impl ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Sets the destination of the processed chunks.
    pub fn writer(mut self, writer: &'a impl ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Sets the number of items per chunk handed to the writer.
    /// Values below 1 are raised to 1.
    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets how many bad rows are logged and skipped before the step fails.
    pub fn skip_limit(mut self, skip_limit: usize) -> Self {
        self.skip_limit = skip_limit;
        self
    }

    /// Sets the number of rows between two progress messages.
    /// Values below 1 are raised to 1.
    pub fn progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval.max(1);
        self
    }

    /// Builds the step.
    ///
    /// # Panics
    /// Panics if the reader, the processor or the writer is missing.
    pub fn build(self) -> ChunkOrientedStep<'a, I, O> {
        ChunkOrientedStep {
            name: self.name.unwrap_or_else(build_name),
            reader: self.reader.expect("Reader is required for building a step"),
            processor: self
                .processor
                .expect("Processor is required for building a step"),
            writer: self.writer.expect("Writer is required for building a step"),
            chunk_size: self.chunk_size,
            skip_limit: self.skip_limit,
            progress_interval: self.progress_interval,
        }
    }
}
