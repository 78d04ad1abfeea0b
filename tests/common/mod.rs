#![allow(dead_code)]

pub mod mocks;

use std::{fs, path::Path, path::PathBuf};

use hotel_review_sync::config::SyncConfig;

pub use mocks::MockApi;

pub const HEADER: &str = "id_review,hotel_name,reviewer_name,reviewer_gender_agegroup,review_date,review_score,review_url,review_title,review_plain,review_html";

pub const BASE_URL: &str = "https://api.test/org/tenant/reinfer_";
pub const SOURCE: &str = "hotels/reviews";
pub const TOKEN: &str = "test-token";

/// A well-formed data row; even rows carry HTML, odd rows only plain text.
pub fn review_line(index: usize) -> String {
    let html = if index % 2 == 0 {
        format!("\"<p>Review <b>{index}</b></p>\"")
    } else {
        String::new()
    };
    let score = if index % 5 == 0 {
        String::new()
    } else {
        (index % 5).to_string()
    };

    format!(
        "r-{index},Hotel {hotel},Guest {index},Female/40s,投稿日：2023/05/{day:02},{score},https://reviews.test/{index},Title {index},\"Plain, review {index}\",{html}",
        hotel = index % 7,
        day = index % 28 + 1,
    )
}

/// Writes `header + lines` to `input.csv` inside `dir`.
pub fn write_csv(dir: &Path, lines: &[String]) -> PathBuf {
    let path = dir.join("input.csv");
    let mut content = String::from(HEADER);
    content.push('\n');
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

pub fn reviews_csv(dir: &Path, rows: usize) -> PathBuf {
    let lines: Vec<String> = (1..=rows).map(review_line).collect();
    write_csv(dir, &lines)
}

pub fn config(dir: &Path, input: PathBuf) -> SyncConfig {
    SyncConfig {
        input,
        base_url: BASE_URL.to_string(),
        source: SOURCE.to_string(),
        token: TOKEN.to_string(),
        errors_folder: dir.join("errors"),
        ..SyncConfig::default()
    }
}

pub fn endpoint() -> String {
    format!("{BASE_URL}/api/v1/sources/{SOURCE}/sync-raw-emails")
}

/// Number of entries in `dir`, 0 when it does not exist.
pub fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
