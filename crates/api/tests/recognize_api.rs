//! Integration tests for the `/recognize` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_multipart, MultipartBody, PNG_BYTES};
use facebytes_core::{JobId, JobState};

// ---------------------------------------------------------------------------
// Test: POST /recognize accepts an upload and returns a pending job
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recognize_accepts_upload_and_returns_pending_job() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new()
        .file("file", "selfie.png", PNG_BYTES)
        .text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["state"], "PENDING");
    let id = JobId::from(json["data"]["job_id"].as_str().expect("job_id missing"));

    // The stub work function succeeds, so the job becomes SUCCESS.
    let record = common::wait_for_terminal(&app.engine, &id).await;
    assert_eq!(record.state, JobState::Success);
    assert_eq!(record.job_type, "recognize");
    assert!(record.result.unwrap().contains("verified"));
}

// ---------------------------------------------------------------------------
// Test: unsupported file extensions are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recognize_rejects_unsupported_extension() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new()
        .file("file", "archive.zip", b"PK\x03\x04")
        .text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Only PNG, JPG, and JPEG are allowed"));

    // Nothing was staged for the rejected upload.
    assert_eq!(std::fs::read_dir(app.spool_dir()).unwrap().count(), 0);
}

// ---------------------------------------------------------------------------
// Test: missing fields are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recognize_requires_reference_dir() {
    let app = common::spawn_app().await;

    let body = MultipartBody::new().file("file", "selfie.png", PNG_BYTES);
    let response = post_multipart(&app.app, "/recognize", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("reference_dir"));
}

#[tokio::test]
async fn recognize_requires_file() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new().text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("file"));
}

// ---------------------------------------------------------------------------
// Test: batch submissions report one outcome per upload, in order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recognize_batch_reports_per_item_outcomes() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new()
        .file("files", "a.png", PNG_BYTES)
        .file("files", "b.gif", b"GIF89a")
        .file("files", "c.jpg", PNG_BYTES)
        .text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize/batch", body).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    let items = json["data"].as_array().expect("data must be an array");
    assert_eq!(items.len(), 3);

    // One bad file does not sink the batch: the valid uploads get job
    // ids and the invalid one gets an error, all in upload order.
    assert_eq!(items[0]["filename"], "a.png");
    assert!(items[0]["job_id"].is_string());
    assert_eq!(items[1]["filename"], "b.gif");
    assert!(items[1]["error"].as_str().unwrap().contains("Invalid file type"));
    assert_eq!(items[2]["filename"], "c.jpg");
    assert!(items[2]["job_id"].is_string());
}

#[tokio::test]
async fn recognize_batch_requires_uploads() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new().text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize/batch", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: staged uploads are cleaned up once jobs finish
// ---------------------------------------------------------------------------

#[tokio::test]
async fn staged_uploads_are_removed_after_completion() {
    let app = common::spawn_app().await;
    let refs = app.reference_dir().display().to_string();

    let body = MultipartBody::new()
        .file("file", "selfie.png", PNG_BYTES)
        .text("reference_dir", &refs);
    let response = post_multipart(&app.app, "/recognize", body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    let id = JobId::from(json["data"]["job_id"].as_str().unwrap());

    common::wait_for_terminal(&app.engine, &id).await;
    common::wait_for_empty_spool(&app.spool_dir()).await;
}
