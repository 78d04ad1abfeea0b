use std::{cell::Cell, io::Write};

use log::{debug, error, info};
use serde::Serialize;

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::BatchError,
};

use super::{error_dump::ErrorDump, transport::Transport};

/// Transform tag sent with every batch unless configured otherwise.
pub const DEFAULT_TRANSFORM_TAG: &str = "generic.0.CONVKER5";

#[derive(Serialize)]
struct SyncRawEmailsRequest<'a, D> {
    documents: &'a [D],
    transform_tag: &'a str,
}

/// Uploads each chunk of documents in a single `sync-raw-emails` request.
///
/// A `200` answer is pretty-printed to stdout. Any other status is logged and
/// the whole chunk is saved through the [`ErrorDump`]; the write still
/// succeeds and the chunk is never sent again. Transport failures are
/// returned as errors.
///
/// An empty chunk sends nothing.
pub struct SyncRawEmailsWriter<T> {
    transport: T,
    endpoint: String,
    token: String,
    transform_tag: String,
    error_dump: ErrorDump,
    upload_count: Cell<usize>,
    uploaded_documents: Cell<usize>,
    failed_batches: Cell<usize>,
}

impl<T: Transport> SyncRawEmailsWriter<T> {
    /// Requests sent so far.
    pub fn upload_count(&self) -> usize {
        self.upload_count.get()
    }

    /// Documents accepted by the API.
    pub fn uploaded_documents(&self) -> usize {
        self.uploaded_documents.get()
    }

    /// Batches rejected by the API and saved to the errors folder.
    pub fn failed_batches(&self) -> usize {
        self.failed_batches.get()
    }

    fn print_response(&self, body: &str) -> ItemWriterResult {
        let pretty = render_response(body)?;

        writeln!(std::io::stdout().lock(), "{pretty}")
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

/// Pretty-prints a JSON response body with object keys in sorted order.
pub fn render_response(body: &str) -> Result<String, BatchError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|error| {
        BatchError::ItemWriter(format!("response is not valid JSON: {error}"))
    })?;

    // Sorted as long as serde_json's `preserve_order` feature is off.
    serde_json::to_string_pretty(&value).map_err(|error| BatchError::ItemWriter(error.to_string()))
}

impl<T: Transport, D: Serialize> ItemWriter<D> for SyncRawEmailsWriter<T> {
    fn write(&self, items: &[D]) -> ItemWriterResult {
        if items.is_empty() {
            debug!("Empty batch, nothing to upload");
            return Ok(());
        }

        let request = SyncRawEmailsRequest {
            documents: items,
            transform_tag: &self.transform_tag,
        };
        let body = serde_json::to_string(&request)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        self.upload_count.set(self.upload_count.get() + 1);
        let response = self.transport.post_json(&self.endpoint, &self.token, body)?;

        if response.status == 200 {
            self.uploaded_documents
                .set(self.uploaded_documents.get() + items.len());
            info!("Uploaded batch of {} documents", items.len());
            return self.print_response(&response.body);
        }

        error!(
            "API call failed with status {} for a batch of {} documents",
            response.status,
            items.len()
        );
        let path = self.error_dump.write(items)?;
        self.failed_batches.set(self.failed_batches.get() + 1);
        error!("Failed batch saved to {}", path.display());

        Ok(())
    }
}

/// Builder for [`SyncRawEmailsWriter`].
///
/// ```
/// use hotel_review_sync::item::sync::{
///     SyncRawEmailsWriterBuilder, Transport, TransportResponse,
/// };
/// use hotel_review_sync::error::BatchError;
///
/// struct Offline;
///
/// impl Transport for Offline {
///     fn post_json(&self, _: &str, _: &str, _: String) -> Result<TransportResponse, BatchError> {
///         Ok(TransportResponse { status: 200, body: "{}".to_string() })
///     }
/// }
///
/// let writer = SyncRawEmailsWriterBuilder::new()
///     .endpoint("https://example.com/api/v1/sources/proj/src/sync-raw-emails")
///     .token("secret")
///     .build(Offline);
///
/// assert_eq!(writer.upload_count(), 0);
/// ```
pub struct SyncRawEmailsWriterBuilder {
    endpoint: Option<String>,
    token: String,
    transform_tag: String,
    error_dump: ErrorDump,
}

impl Default for SyncRawEmailsWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRawEmailsWriterBuilder {
    /// Creates a builder with the default transform tag and errors folder.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            token: String::new(),
            transform_tag: DEFAULT_TRANSFORM_TAG.to_string(),
            error_dump: ErrorDump::default(),
        }
    }

    /// Full URL of the `sync-raw-emails` endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Bearer token sent in the `Authorization` header.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Tag sent alongside the documents of every batch.
    pub fn transform_tag(mut self, transform_tag: impl Into<String>) -> Self {
        self.transform_tag = transform_tag.into();
        self
    }

    /// Where rejected batches are saved.
    pub fn error_dump(mut self, error_dump: ErrorDump) -> Self {
        self.error_dump = error_dump;
        self
    }

    /// Builds the writer around `transport`.
    ///
    /// # Panics
    /// Panics if no endpoint was set.
    pub fn build<T: Transport>(self, transport: T) -> SyncRawEmailsWriter<T> {
        SyncRawEmailsWriter {
            transport,
            endpoint: self
                .endpoint
                .expect("Endpoint is required for building a sync writer"),
            token: self.token,
            transform_tag: self.transform_tag,
            error_dump: self.error_dump,
            upload_count: Cell::new(0),
            uploaded_documents: Cell::new(0),
            failed_batches: Cell::new(0),
        }
    }
}
