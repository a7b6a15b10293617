//! Integration tests for the `/compare` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_multipart, MultipartBody, PNG_BYTES};
use facebytes_core::{JobId, JobState};

// ---------------------------------------------------------------------------
// Test: POST /compare submits a job for two uploads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn compare_accepts_two_files_and_completes() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("file1", "left.png", PNG_BYTES)
        .file("file2", "right.jpg", PNG_BYTES);
    let response = post_multipart(&app.app, "/compare", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    let id = JobId::from(json["data"]["job_id"].as_str().expect("job_id missing"));

    let record = common::wait_for_terminal(&app.engine, &id).await;
    assert_eq!(record.state, JobState::Success);
    assert_eq!(record.job_type, "compare");
}

#[tokio::test]
async fn compare_requires_both_files() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new().file("file1", "left.png", PNG_BYTES);
    let response = post_multipart(&app.app, "/compare", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("file2"));
}

#[tokio::test]
async fn compare_rejects_invalid_extension_without_staging() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("file1", "left.png", PNG_BYTES)
        .file("file2", "notes.txt", b"hello");
    let response = post_multipart(&app.app, "/compare", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(std::fs::read_dir(app.spool_dir()).unwrap().count(), 0);
}

// ---------------------------------------------------------------------------
// Test: batch comparisons pair uploads according to the policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn compare_batch_adjacent_produces_n_minus_one_jobs() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "b.png", PNG_BYTES)
        .file("files", "c.png", PNG_BYTES)
        .file("files", "d.png", PNG_BYTES);
    let response = post_multipart(&app.app, "/compare/batch", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    let jobs = json["data"]["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 3);
    assert!(json["data"]["rejected"].as_array().unwrap().is_empty());

    // Adjacent pairing preserves upload order.
    assert_eq!(jobs[0]["first"], "a.png");
    assert_eq!(jobs[0]["second"], "b.png");
    assert_eq!(jobs[2]["first"], "c.png");
    assert_eq!(jobs[2]["second"], "d.png");
}

#[tokio::test]
async fn compare_batch_all_pairs_produces_every_pair() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "b.png", PNG_BYTES)
        .file("files", "c.png", PNG_BYTES)
        .text("pairing", "all-pairs");
    let response = post_multipart(&app.app, "/compare/batch", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["jobs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn compare_batch_rejects_unknown_pairing_policy() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "b.png", PNG_BYTES)
        .text("pairing", "zigzag");
    let response = post_multipart(&app.app, "/compare/batch", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("zigzag"));
}

#[tokio::test]
async fn compare_batch_needs_two_valid_images() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "b.tiff", b"II*\x00");
    let response = post_multipart(&app.app, "/compare/batch", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("at least two valid images"));
}

#[tokio::test]
async fn compare_batch_reports_rejected_files() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "bad.bmp", b"BM")
        .file("files", "c.png", PNG_BYTES);
    let response = post_multipart(&app.app, "/compare/batch", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    // The two valid uploads form a single adjacent pair.
    let jobs = json["data"]["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["first"], "a.png");
    assert_eq!(jobs[0]["second"], "c.png");

    let rejected = json["data"]["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["filename"], "bad.bmp");
}
