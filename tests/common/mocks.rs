//! Mock of the HTTP transport used by the uploader.
use mockall::mock;

use hotel_review_sync::{
    error::BatchError,
    item::sync::{Transport, TransportResponse},
};

mock! {
    pub Api {}
    impl Transport for Api {
        fn post_json(
            &self,
            url: &str,
            bearer_token: &str,
            body: String,
        ) -> Result<TransportResponse, BatchError>;
    }
}
