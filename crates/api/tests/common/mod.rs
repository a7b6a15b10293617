//! Shared helpers for API integration tests.
//!
//! Each test gets an isolated environment: a fresh temp directory holding
//! the SQLite database and the spool directory, an engine running a stub
//! work function, and the full production router (same middleware stack
//! as `main.rs`).

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use facebytes_api::config::ServerConfig;
use facebytes_api::router::build_app_router;
use facebytes_api::state::AppState;
use facebytes_core::{BatchPairing, JobId, WorkInput};
use facebytes_db::models::job::JobRecord;
use facebytes_engine::{EngineConfig, JobEngine};

/// Arbitrary bytes with a PNG magic prefix. The stub work functions never
/// decode uploads, so the content only has to survive staging.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n not a real image";

pub struct TestApp {
    pub app: Router,
    pub engine: Arc<JobEngine>,
    pub dir: TempDir,
}

impl TestApp {
    /// Spool directory holding staged uploads.
    pub fn spool_dir(&self) -> PathBuf {
        self.dir.path().join("spool")
    }

    /// Empty directory usable as a `reference_dir` form value.
    pub fn reference_dir(&self) -> PathBuf {
        self.dir.path().join("refs")
    }
}

/// Spawn a test app whose work function always succeeds with a small
/// verification payload.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_input: &WorkInput| {
        Ok(serde_json::json!({ "verified": true, "distance": 0.05 }))
    })
    .await
}

/// Spawn a test app with the given work function closure.
pub async fn spawn_app_with<F>(work: F) -> TestApp
where
    F: Fn(&WorkInput) -> Result<serde_json::Value, String> + Send + Sync + 'static,
{
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let spool_dir = dir.path().join("spool");
    std::fs::create_dir_all(&spool_dir).expect("Failed to create spool dir");
    std::fs::create_dir_all(dir.path().join("refs")).expect("Failed to create refs dir");

    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let pool = facebytes_db::create_pool(&url)
        .await
        .expect("Failed to create test pool");
    facebytes_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let engine_config = EngineConfig {
        workers: 2,
        queue_capacity: 16,
        enqueue_wait_ms: 50,
        job_deadline_secs: None,
        pairing: BatchPairing::Adjacent,
    };
    let engine = JobEngine::start(pool, engine_config, Arc::new(work));

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        spool_dir,
        max_upload_bytes: 25 * 1024 * 1024,
    };

    let state = AppState {
        engine: Arc::clone(&engine),
        config: Arc::new(config.clone()),
    };

    TestApp {
        app: build_app_router(state, &config),
        engine,
        dir,
    }
}

/// Issue a GET request against the router.
pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body was not valid JSON")
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "facebytes-test-boundary";

/// Hand-assembled `multipart/form-data` body for upload tests.
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Body {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(self.buf)
    }
}

/// POST a multipart body against the router.
pub async fn post_multipart(app: &Router, uri: &str, body: MultipartBody) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(body.finish())
                .expect("Failed to build request"),
        )
        .await
        .expect("Request failed")
}

// ---------------------------------------------------------------------------
// Polling helpers
// ---------------------------------------------------------------------------

/// Poll the engine until the job reaches a terminal state.
pub async fn wait_for_terminal(engine: &JobEngine, id: &JobId) -> JobRecord {
    for _ in 0..250 {
        let record = engine.query(id).await.expect("Job must exist");
        if record.state.is_terminal() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Job {id} did not reach a terminal state in time");
}

/// Poll until the spool directory is empty (workers remove staged files
/// shortly after finishing a job).
pub async fn wait_for_empty_spool(spool_dir: &std::path::Path) {
    for _ in 0..250 {
        let count = std::fs::read_dir(spool_dir)
            .expect("Failed to read spool dir")
            .count();
        if count == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Spool directory was not emptied in time");
}
