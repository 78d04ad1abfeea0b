use serde::{Deserialize, Serialize};

/// One data row of the hotel review export.
///
/// Fields are bound by column position, in the order below. A column that
/// holds no value is an empty string, never a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewRow {
    pub id_review: String,
    pub hotel_name: String,
    pub reviewer_name: String,
    /// Gender and age group joined by a single `/`, e.g. `Male/30s`
    pub reviewer_gender_agegroup: String,
    /// Localized date with its label prefix, e.g. `投稿日：2023/05/10`
    pub review_date: String,
    pub review_score: String,
    pub review_url: String,
    pub review_title: String,
    pub review_plain: String,
    pub review_html: String,
}

impl ReviewRow {
    /// Number of columns of a data row.
    pub const FIELD_COUNT: usize = 10;
}
