use chrono::{NaiveDate, NaiveTime};
use scraper::Html;

use crate::{
    core::item::{ItemProcessor, ItemProcessorResult},
    error::BatchError,
};

use super::{
    document::{Body, Document, Headers, ParsedHeaders, RawEmail, UserProperties},
    error::TransformError,
    row::ReviewRow,
};

/// Label the review site puts in front of every date.
pub const REVIEW_DATE_LABEL: &str = "投稿日：";

const REVIEW_DATE_FORMAT: &str = "%Y/%m/%d";

/// RFC 2822 layout without the zone, since review dates carry none.
const EMAIL_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Elements whose text never shows on a rendered page.
const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "head", "title", "template"];

/// Converts one review row into the document sent to the API.
///
/// Every field is trimmed first. The body is the original HTML when it
/// renders to some visible text, the plain-text column otherwise.
pub fn row_to_document(row: &ReviewRow) -> Result<Document, TransformError> {
    let review_html = row.review_html.trim();
    let review_date = row.review_date.trim().replace(REVIEW_DATE_LABEL, "");
    let review_score = parse_score(row.review_score.trim())?;
    let (reviewer_gender, reviewer_agegroup) =
        split_gender_agegroup(row.reviewer_gender_agegroup.trim())?;

    let body = if html_body_exists(review_html) {
        Body::Html(review_html.to_owned())
    } else {
        Body::Plain(row.review_plain.trim().to_owned())
    };

    let reviewer_name = row.reviewer_name.trim().to_owned();

    Ok(Document {
        raw_email: RawEmail {
            body,
            headers: Headers {
                parsed: ParsedHeaders {
                    date: format_email_date(review_date.trim())?,
                    from: reviewer_name.clone(),
                    message_id: row.id_review.trim().to_owned(),
                    subject: row.review_title.trim().to_owned(),
                },
            },
        },
        user_properties: UserProperties {
            hotel_name: row.hotel_name.trim().to_owned(),
            reviewer_name,
            reviewer_gender: reviewer_gender.to_owned(),
            reviewer_agegroup: reviewer_agegroup.to_owned(),
            review_score,
            review_url: row.review_url.trim().to_owned(),
        },
    })
}

/// Reformats a `YYYY/MM/DD` date as an email `Date` header at midnight.
pub fn format_email_date(review_date: &str) -> Result<String, TransformError> {
    let date = NaiveDate::parse_from_str(review_date, REVIEW_DATE_FORMAT).map_err(|source| {
        TransformError::InvalidDate {
            value: review_date.to_owned(),
            source,
        }
    })?;

    Ok(date
        .and_time(NaiveTime::MIN)
        .format(EMAIL_DATE_FORMAT)
        .to_string())
}

/// Splits `Male/30s` into `("Male", "30s")`.
pub fn split_gender_agegroup(value: &str) -> Result<(&str, &str), TransformError> {
    let mut parts = value.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(gender), Some(agegroup), None) => Ok((gender, agegroup)),
        _ => Err(TransformError::InvalidGenderAgeGroup(value.to_owned())),
    }
}

/// An empty score counts as 0.
pub fn parse_score(value: &str) -> Result<i64, TransformError> {
    if value.is_empty() {
        return Ok(0);
    }

    value
        .parse()
        .map_err(|source| TransformError::InvalidScore {
            value: value.to_owned(),
            source,
        })
}

/// Whether the HTML renders to any visible text.
pub fn html_body_exists(review_html: &str) -> bool {
    !visible_text(review_html).trim().is_empty()
}

fn visible_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::new();

    for node in fragment.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| HIDDEN_ELEMENTS.contains(&element.name()));

        if !hidden {
            text.push_str(chunk);
        }
    }

    text
}

/// `ItemProcessor` adapter around [`row_to_document`].
#[derive(Default)]
pub struct ReviewDocumentProcessor;

impl ItemProcessor<ReviewRow, Document> for ReviewDocumentProcessor {
    fn process(&self, item: &ReviewRow) -> ItemProcessorResult<Document> {
        row_to_document(item).map_err(|err| {
            BatchError::ItemProcessor(format!("review {}: {}", item.id_review.trim(), err))
        })
    }
}
