mod common;

use std::{
    fs,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use serde_json::Value;

use common::{MockApi, TOKEN, config, endpoint, file_count, review_line, reviews_csv, write_csv};
use hotel_review_sync::{
    error::BatchError,
    item::sync::TransportResponse,
    pipeline::{dry_run, sync_reviews},
};

fn ok_response() -> TransportResponse {
    TransportResponse {
        status: 200,
        body: r#"{"status": "ok"}"#.to_string(),
    }
}

/// Mock answering every call with `respond(call_index)` and recording bodies.
fn recording_api(
    expected_calls: usize,
    respond: impl Fn(usize) -> Result<TransportResponse, BatchError> + Send + 'static,
) -> (MockApi, Arc<Mutex<Vec<Value>>>) {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&bodies);
    let calls = AtomicUsize::new(0);

    let mut api = MockApi::new();
    api.expect_post_json()
        .times(expected_calls)
        .returning(move |url, token, body| {
            assert_eq!(url, endpoint());
            assert_eq!(token, TOKEN);
            recorded
                .lock()
                .unwrap()
                .push(serde_json::from_str(&body).unwrap());
            respond(calls.fetch_add(1, Ordering::SeqCst))
        });

    (api, bodies)
}

fn document_count(body: &Value) -> usize {
    body["documents"].as_array().unwrap().len()
}

#[test]
fn uploads_299_rows_in_two_batches() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 299);
    let (api, bodies) = recording_api(2, |_| Ok(ok_response()));

    let summary = sync_reviews(&config(dir.path(), input), api).unwrap();

    let bodies = bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(document_count(&bodies[0]), 256);
    assert_eq!(document_count(&bodies[1]), 43);
    assert_eq!(bodies[0]["transform_tag"], "generic.0.CONVKER5");

    // Order of the source file is kept across batches.
    assert_eq!(
        bodies[0]["documents"][0]["raw_email"]["headers"]["parsed"]["Message-ID"],
        "r-1"
    );
    assert_eq!(
        bodies[1]["documents"][42]["raw_email"]["headers"]["parsed"]["Message-ID"],
        "r-299"
    );

    assert_eq!(summary.upload_count, 2);
    assert_eq!(summary.uploaded_documents, 299);
    assert_eq!(summary.failed_batches, 0);
    let step = summary.step().unwrap();
    assert_eq!(step.read_count, 299);
    assert_eq!(step.write_call_count, 2);
    assert_eq!(file_count(&dir.path().join("errors")), 0);
}

#[test]
fn documents_follow_the_api_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 5);
    let (api, bodies) = recording_api(1, |_| Ok(ok_response()));

    sync_reviews(&config(dir.path(), input), api).unwrap();

    let bodies = bodies.lock().unwrap();
    let documents = bodies[0]["documents"].as_array().unwrap();

    // Row 1 has no HTML, row 2 does.
    assert_eq!(documents[0]["raw_email"]["body"]["plain"], "Plain, review 1");
    assert!(documents[0]["raw_email"]["body"].get("html").is_none());
    assert_eq!(documents[1]["raw_email"]["body"]["html"], "<p>Review <b>2</b></p>");
    assert!(documents[1]["raw_email"]["body"].get("plain").is_none());

    let parsed = &documents[0]["raw_email"]["headers"]["parsed"];
    assert_eq!(parsed["Date"], "Tue, 02 May 2023 00:00:00");
    assert_eq!(parsed["From"], "Guest 1");
    assert_eq!(parsed["Subject"], "Title 1");

    let properties = &documents[0]["user_properties"];
    assert_eq!(properties["string:Hotel_Name"], "Hotel 1");
    assert_eq!(properties["string:Reviewer_Gender"], "Female");
    assert_eq!(properties["string:Reviewer_AgeGroup"], "40s");
    assert_eq!(properties["number:Review_Score"], 1);
    assert_eq!(properties["string:Review_URL"], "https://reviews.test/1");

    // Row 5 has an empty score.
    assert_eq!(documents[4]["user_properties"]["number:Review_Score"], 0);
}

#[test]
fn exact_multiple_of_batch_size_sends_no_empty_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 512);
    let (api, bodies) = recording_api(2, |_| Ok(ok_response()));

    let summary = sync_reviews(&config(dir.path(), input), api).unwrap();

    let bodies = bodies.lock().unwrap();
    assert!(bodies.iter().all(|body| document_count(body) == 256));
    // The final flush still happens, with nothing in it.
    assert_eq!(summary.step().unwrap().write_call_count, 3);
    assert_eq!(summary.upload_count, 2);
}

#[test]
fn header_only_file_sends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), &[]);
    let (api, _) = recording_api(0, |_| Ok(ok_response()));

    let summary = sync_reviews(&config(dir.path(), input), api).unwrap();

    assert_eq!(summary.upload_count, 0);
    assert_eq!(summary.step().unwrap().read_count, 0);
}

#[test]
fn header_of_another_width_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.csv");
    let rows: Vec<String> = (1..=3).map(review_line).collect();
    fs::write(&input, format!("id,hotel,reviewer\n{}\n", rows.join("\n"))).unwrap();
    let (api, bodies) = recording_api(1, |_| Ok(ok_response()));

    let summary = sync_reviews(&config(dir.path(), input), api).unwrap();

    assert_eq!(document_count(&bodies.lock().unwrap()[0]), 3);
    assert_eq!(summary.step().unwrap().read_error_count, 0);
}

#[test]
fn short_row_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<String> = (1..=4).map(review_line).collect();
    lines[1] = "r-2,Hotel 2,Guest 2".to_string();
    let input = write_csv(dir.path(), &lines);
    let (api, bodies) = recording_api(1, |_| Ok(ok_response()));
    let mut config = config(dir.path(), input);
    config.skip_limit = 1;

    let summary = sync_reviews(&config, api).unwrap();

    assert_eq!(document_count(&bodies.lock().unwrap()[0]), 3);
    assert_eq!(summary.step().unwrap().read_error_count, 1);
}

#[test]
fn rejected_batch_is_saved_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 299);
    let (api, bodies) = recording_api(2, |call| {
        if call == 0 {
            Ok(TransportResponse {
                status: 422,
                body: "unprocessable".to_string(),
            })
        } else {
            Ok(ok_response())
        }
    });

    let summary = sync_reviews(&config(dir.path(), input), api).unwrap();

    assert_eq!(summary.failed_batches, 1);
    assert_eq!(summary.uploaded_documents, 43);

    let errors = dir.path().join("errors");
    let entries: Vec<_> = fs::read_dir(&errors).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let content = fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    let dumped: Value = serde_json::from_str(&content).unwrap();
    let bodies = bodies.lock().unwrap();
    assert_eq!(dumped, bodies[0]["documents"]);
    assert_eq!(dumped.as_array().unwrap().len(), 256);
}

#[test]
fn transport_failure_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 10);
    let (api, _) = recording_api(1, |_| {
        Err(BatchError::ItemWriter("connection refused".to_string()))
    });

    let result = sync_reviews(&config(dir.path(), input), api);

    assert!(matches!(result, Err(BatchError::Step(_))));
    assert_eq!(file_count(&dir.path().join("errors")), 0);
}

#[test]
fn bad_row_aborts_run_after_earlier_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<String> = (1..=10).map(review_line).collect();
    lines[4] = lines[4].replace(",Female/40s,", ",Female,");
    let input = write_csv(dir.path(), &lines);

    let (api, bodies) = recording_api(2, |_| Ok(ok_response()));
    let mut config = config(dir.path(), input);
    config.batch_size = 2;

    let result = sync_reviews(&config, api);

    match result {
        Err(BatchError::Step(message)) => assert!(message.contains("r-5")),
        other => panic!("expected a step failure, got {other:?}"),
    }
    // Rows 1-4 were already uploaded; nothing after row 5 is.
    assert_eq!(bodies.lock().unwrap().len(), 2);
}

#[test]
fn skip_limit_lets_bad_rows_through() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<String> = (1..=10).map(review_line).collect();
    lines[2] = lines[2].replace("投稿日：2023/05/04", "投稿日：yesterday");
    lines[7] = lines[7].replace(",Female/40s,", ",Female/40s/x,");
    let input = write_csv(dir.path(), &lines);

    let (api, bodies) = recording_api(1, |_| Ok(ok_response()));
    let mut config = config(dir.path(), input);
    config.skip_limit = 2;

    let summary = sync_reviews(&config, api).unwrap();

    assert_eq!(document_count(&bodies.lock().unwrap()[0]), 8);
    let step = summary.step().unwrap();
    assert_eq!(step.process_error_count, 2);
    assert_eq!(step.process_count, 8);
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (api, _) = recording_api(0, |_| Ok(ok_response()));

    let result = sync_reviews(&config(dir.path(), dir.path().join("nope.csv")), api);

    assert!(matches!(result, Err(BatchError::ItemReader(_))));
}

#[test]
fn dry_run_transforms_without_uploading() {
    let dir = tempfile::tempdir().unwrap();
    let input = reviews_csv(dir.path(), 12);
    let mut config = config(dir.path(), input);
    config.token.clear();
    config.dry_run = true;

    let summary = dry_run(&config).unwrap();

    assert_eq!(summary.upload_count, 0);
    assert_eq!(summary.step().unwrap().process_count, 12);
    assert_eq!(file_count(&dir.path().join("errors")), 0);
}
