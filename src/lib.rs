/*!
 # Hotel review sync

 Uploads a hotel review CSV export to a Communications Mining style
 ingestion API as raw email documents.

 Each data row of the export becomes one [`Document`](item::review::Document):
 the review body as HTML (or plain text when the HTML renders empty), email
 headers built from the reviewer, review id, title and date, and typed user
 properties for the hotel, reviewer and score. Documents are sent in batches
 of 256 to `POST {base_url}/api/v1/sources/{source}/sync-raw-emails`.
 A batch the API rejects is written to the errors folder and the run goes on.

 ## Core Concepts

- **ItemReader:** retrieves the input of a step one item at a time
  ([`CsvItemReader`](item::csv::csv_reader::CsvItemReader)).
- **ItemProcessor:** turns one input item into one output item
  ([`ReviewDocumentProcessor`](item::review::ReviewDocumentProcessor)).
- **ItemWriter:** receives the output one chunk at a time
  ([`SyncRawEmailsWriter`](item::sync::SyncRawEmailsWriter)).
- **Step:** reads, processes and writes in chunks of a fixed size.
- **Job:** runs one or more steps in order.

 ## Getting Started

```no_run
use hotel_review_sync::{
    config::SyncConfig,
    item::sync::HttpTransport,
    pipeline::sync_reviews,
};

fn main() -> Result<(), hotel_review_sync::BatchError> {
    let config = SyncConfig {
        base_url: "https://cloud.example.com/org/tenant/reinfer_".to_string(),
        source: "hotels/reviews".to_string(),
        token: std::env::var("REINFER_TOKEN").unwrap_or_default(),
        ..SyncConfig::default()
    };

    let summary = sync_reviews(&config, HttpTransport::new(config.timeout)?)?;
    summary.log();

    Ok(())
}
```
 */

/// Run configuration
pub mod config;

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Readers, processors and writers of the review pipeline
pub mod item;

/// Review sync job wiring
pub mod pipeline;
