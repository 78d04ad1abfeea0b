//! Upload of document batches to the `sync-raw-emails` endpoint.
//!
//! The HTTP exchange sits behind the [`Transport`] trait so the writer can be
//! driven without a network. Batches the API rejects are saved by
//! [`ErrorDump`] and never retried.

mod error_dump;
mod sync_writer;
mod transport;

pub use error_dump::{DEFAULT_ERRORS_FOLDER, ErrorDump};
pub use sync_writer::{
    DEFAULT_TRANSFORM_TAG, SyncRawEmailsWriter, SyncRawEmailsWriterBuilder, render_response,
};
pub use transport::{HttpTransport, Transport, TransportResponse};
