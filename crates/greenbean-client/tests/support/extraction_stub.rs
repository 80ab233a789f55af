use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::{Builder, TempDir};
use tokio::net::TcpListener;

pub const EXTRACT_PATH: &str = "/extract";

/// A request the stub extraction service received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    response: Value,
}

impl Recorder {
    pub fn new(response: Value) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn record(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest { headers, body });
    Json(recorder.response.clone())
}

pub fn recording_router(recorder: Recorder) -> Router {
    Router::new()
        .route(EXTRACT_PATH, post(record))
        .with_state(recorder)
}

pub fn line_items_router(items: Value) -> Router {
    recording_router(Recorder::new(json!({ "line_items": items })))
}

pub fn status_router(status: StatusCode) -> Router {
    Router::new().route(EXTRACT_PATH, post(move || async move { status }))
}

pub fn text_router(body: &'static str) -> Router {
    Router::new().route(EXTRACT_PATH, post(move || async move { body }))
}

pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        EXTRACT_PATH,
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({ "line_items": [] }))
        }),
    )
}

/// Serves `router` on an ephemeral port inside the current runtime.
pub async fn spawn_stub(router: Router) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{address}{EXTRACT_PATH}"))
}

/// Address nothing is listening on.
pub async fn closed_endpoint() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{address}{EXTRACT_PATH}"))
}

/// Stub service on its own runtime, for tests that drive blocking commands.
pub struct StubServer {
    _runtime: tokio::runtime::Runtime,
    url: String,
}

impl StubServer {
    pub fn start(router: Router) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let url = runtime.block_on(spawn_stub(router))?;
        Ok(Self {
            _runtime: runtime,
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("greenbean-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_receipt_image(home: &Path) -> std::io::Result<PathBuf> {
    let path = home.join("receipt.jpg");
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10])?;
    Ok(path)
}
