/// CSV support for reading tabular source data.
///
/// [`csv_reader::CsvItemReader`] pulls one record at a time from a file or any
/// `Read` source and deserializes it with serde by column position. The first
/// record is treated as a header and dropped without being looked at.
///
/// # Example
///
/// ```
/// use hotel_review_sync::item::csv::csv_reader::CsvItemReaderBuilder;
/// use hotel_review_sync::core::item::ItemReader;
///
/// let data = "city,pop\nBoston,4628910\nConcord,42695\n";
/// let reader = CsvItemReaderBuilder::new()
///     .field_count(2)
///     .from_reader(data.as_bytes());
///
/// let mut cities: Vec<(String, u32)> = Vec::new();
/// while let Some(city) = reader.read().unwrap() {
///     cities.push(city);
/// }
///
/// assert_eq!(cities.len(), 2);
/// assert_eq!(cities[1], ("Concord".to_string(), 42695));
/// ```
pub mod csv_reader;
