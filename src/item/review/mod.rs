//! Hotel review rows and their conversion into raw email documents.
//!
//! A [`ReviewRow`] is bound positionally from one CSV record.
//! [`row_to_document`] turns it into a [`Document`], failing with a
//! [`TransformError`] when the date, the gender/age group column or the score
//! cannot be parsed.

mod document;
mod error;
mod processor;
mod row;

pub use document::{Body, Document, Headers, ParsedHeaders, RawEmail, UserProperties};
pub use error::TransformError;
pub use processor::{
    REVIEW_DATE_LABEL, ReviewDocumentProcessor, format_email_date, html_body_exists, parse_score,
    row_to_document, split_gender_agegroup,
};
pub use row::ReviewRow;
