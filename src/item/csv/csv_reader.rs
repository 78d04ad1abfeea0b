use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use log::info;
use serde::de::DeserializeOwned;
use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::Read,
    path::Path,
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

/// A CSV item reader that implements the `ItemReader` trait.
///
/// Each record is deserialized into `T` by column position, so `T` is
/// usually a struct whose fields follow the column order of the file.
///
/// The first record is a header and is dropped unconditionally: neither its
/// content nor its width is checked. When a field count is configured, every
/// data record must have exactly that many fields.
///
/// # Examples
///
/// ```
/// use hotel_review_sync::item::csv::csv_reader::CsvItemReaderBuilder;
/// use hotel_review_sync::core::item::ItemReader;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Record {
///     name: String,
///     value: i32,
/// }
///
/// let data = "\
/// name,value
/// foo,123
/// bar,456
/// ";
///
/// let reader = CsvItemReaderBuilder::new().from_reader(data.as_bytes());
///
/// let record: Record = reader.read().unwrap().unwrap();
/// assert_eq!(record.name, "foo");
/// assert_eq!(record.value, 123);
///
/// let record: Record = reader.read().unwrap().unwrap();
/// assert_eq!(record.name, "bar");
///
/// assert!(ItemReader::<Record>::read(&reader).unwrap().is_none());
/// ```
pub struct CsvItemReader<R> {
    /// Iterator over the CSV records
    ///
    /// Uses `RefCell` so records can be pulled through the `&self`
    /// signature of `ItemReader::read`.
    records: RefCell<StringRecordsIntoIter<R>>,
    /// Set until the header row has been dropped
    header_pending: Cell<bool>,
    /// Exact number of fields of a data record, if any
    field_count: Option<usize>,
}

impl<R: Read> CsvItemReader<R> {
    fn new(records: StringRecordsIntoIter<R>, field_count: Option<usize>) -> Self {
        Self {
            records: RefCell::new(records),
            header_pending: Cell::new(true),
            field_count,
        }
    }

    fn skip_header(&self) -> Result<(), BatchError> {
        if !self.header_pending.replace(false) {
            return Ok(());
        }

        if let Some(result) = self.records.borrow_mut().next() {
            result.map_err(|error| BatchError::ItemReader(error.to_string()))?;
            info!("Skipping header row");
        }

        Ok(())
    }
}

impl<R: Read, T: DeserializeOwned> ItemReader<T> for CsvItemReader<R> {
    /// Reads the next item from the CSV source.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a record is successfully read
    /// - `Ok(None)` if there are no more records to read
    /// - `Err(BatchError::ItemReader(error))` if the record is malformed or
    ///   cannot be deserialized into `T`
    fn read(&self) -> ItemReaderResult<T> {
        self.skip_header()?;

        let Some(result) = self.records.borrow_mut().next() else {
            return Ok(None);
        };

        let string_record = result.map_err(|error| BatchError::ItemReader(error.to_string()))?;

        if let Some(expected) = self.field_count {
            if string_record.len() != expected {
                let line = string_record.position().map_or(0, |position| position.line());
                return Err(BatchError::ItemReader(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    expected,
                    string_record.len()
                )));
            }
        }

        string_record
            .deserialize(None)
            .map(Some)
            .map_err(|error| BatchError::ItemReader(error.to_string()))
    }
}

/// A builder for configuring CSV item reading.
///
/// Fields are comma separated and trimmed, records end with CRLF or a bare
/// LF, and the first record is always dropped as a header.
#[derive(Default)]
pub struct CsvItemReaderBuilder {
    field_count: Option<usize>,
}

impl CsvItemReaderBuilder {
    pub fn new() -> Self {
        Self { field_count: None }
    }

    /// Requires every data record to have exactly `field_count` fields.
    ///
    /// Records of any other width are read errors. The header is exempt.
    pub fn field_count(mut self, field_count: usize) -> Self {
        self.field_count = Some(field_count);
        self
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .trim(Trim::All)
            // The header is handled by the item reader so it can be logged.
            .has_headers(false)
            // Widths are checked per record, so the header may differ.
            .flexible(true);
        builder
    }

    /// Creates a `CsvItemReader` from any `Read` source.
    pub fn from_reader<R: Read>(self, rdr: R) -> CsvItemReader<R> {
        let records = self.reader_builder().from_reader(rdr).into_records();

        CsvItemReader::new(records, self.field_count)
    }

    /// Creates a `CsvItemReader` reading the file at `path`.
    ///
    /// # Errors
    /// Returns `BatchError::ItemReader` if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<File>, BatchError> {
        let path = path.as_ref();
        let rdr = self.reader_builder().from_path(path).map_err(|error| {
            BatchError::ItemReader(format!("cannot open {}: {}", path.display(), error))
        })?;

        Ok(CsvItemReader::new(rdr.into_records(), self.field_count))
    }
}
