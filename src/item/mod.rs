/// Writer that logs items, used for dry runs.
pub mod logger;

/// CSV reader for the review export.
pub mod csv;

/// Review rows and their transformation into API documents.
pub mod review;

/// Batch upload to the ingestion API.
pub mod sync;
