use log::debug;

/// Accumulates items until the commit interval is reached.
///
/// Items keep the order in which they were added. Once `should_flush`
/// reports true, the owner is expected to `drain` the chunk and hand the
/// items to a writer.
#[derive(Debug)]
pub struct Chunk<T> {
    items: Vec<T>,
    chunk_size: usize,
}

impl<T> Chunk<T> {
    /// Creates an empty chunk holding up to `chunk_size` items.
    pub fn new(chunk_size: usize) -> Chunk<T> {
        Chunk {
            items: Vec::with_capacity(chunk_size),
            chunk_size,
        }
    }

    /// Appends an item after the ones already held.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Whether the chunk holds at least `chunk_size` items.
    pub fn should_flush(&self) -> bool {
        self.items.len() >= self.chunk_size
    }

    /// Returns the accumulated items and leaves the chunk empty.
    pub fn drain(&mut self) -> Vec<T> {
        debug!("Draining chunk of {} items", self.items.len());
        std::mem::replace(&mut self.items, Vec::with_capacity(self.chunk_size))
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
