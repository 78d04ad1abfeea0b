use thiserror::Error;

/// Reasons a review row cannot be turned into a document.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("review date {value:?} does not match YYYY/MM/DD: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("reviewer gender/age group {0:?} is not of the form <gender>/<age group>")]
    InvalidGenderAgeGroup(String),

    #[error("review score {value:?} is not an integer: {source}")]
    InvalidScore {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
