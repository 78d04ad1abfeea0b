use serde::{Deserialize, Serialize};

/// Email-shaped payload accepted by the `sync-raw-emails` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub raw_email: RawEmail,
    pub user_properties: UserProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEmail {
    pub body: Body,
    pub headers: Headers,
}

/// Message body, serialized as `{"html": ...}` or `{"plain": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Html(String),
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    pub parsed: ParsedHeaders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHeaders {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Message-ID")]
    pub message_id: String,
    #[serde(rename = "Subject")]
    pub subject: String,
}

/// Typed metadata; the key prefix tells the API how to index each value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProperties {
    #[serde(rename = "string:Hotel_Name")]
    pub hotel_name: String,
    #[serde(rename = "string:Reviewer_Name")]
    pub reviewer_name: String,
    #[serde(rename = "string:Reviewer_Gender")]
    pub reviewer_gender: String,
    #[serde(rename = "string:Reviewer_AgeGroup")]
    pub reviewer_agegroup: String,
    #[serde(rename = "number:Review_Score")]
    pub review_score: i64,
    #[serde(rename = "string:Review_URL")]
    pub review_url: String,
}
