use crate::error::BatchError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, BatchError>;

/// Result of transforming one item.
pub type ItemProcessorResult<O> = Result<O, BatchError>;

/// Result of writing one chunk of items.
pub type ItemWriterResult = Result<(), BatchError>;

/// Retrieves the input of a step, one item at a time.
pub trait ItemReader<I> {
    fn read(&self) -> ItemReaderResult<I>;
}

/// Turns one read item into one output item.
pub trait ItemProcessor<I, O> {
    fn process(&self, item: &I) -> ItemProcessorResult<O>;
}

/// Receives the output of a step, one chunk at a time.
///
/// `write` may be called with an empty slice when the final chunk of a step
/// holds no items; implementations must treat that as a no-op.
pub trait ItemWriter<O> {
    fn write(&self, items: &[O]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}

