//! In-process mock of the FMP REST API for integration tests.
//!
//! Serves canned JSON per request path on an ephemeral localhost port and
//! records every request (path + query) so tests can assert on endpoint and
//! parameter construction.

use anyhow::Context as _;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// One canned response, keyed by exact request path (e.g. `/quote/AAPL`).
#[derive(Debug, Clone)]
pub struct StubRoute {
    pub path: String,
    pub status: u16,
    pub body: Value,
}

impl StubRoute {
    pub fn ok(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            status: 200,
            body,
        }
    }

    pub fn error(path: impl Into<String>, status: u16, body: Value) -> Self {
        Self {
            path: path.into(),
            status,
            body,
        }
    }
}

/// One request observed by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

impl RecordedRequest {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

struct MockState {
    routes: HashMap<String, (u16, Value)>,
    seen: Mutex<Vec<RecordedRequest>>,
}

pub struct MockFmp {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl MockFmp {
    /// Start the mock on an ephemeral port.
    ///
    /// Unstubbed paths answer `404` with an FMP-style error body.
    ///
    /// # Errors
    ///
    /// Returns an error if binding a localhost listener fails.
    pub async fn start(routes: Vec<StubRoute>) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            routes: routes
                .into_iter()
                .map(|r| (r.path, (r.status, r.body)))
                .collect(),
            seen: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/{*path}", any(handle))
            .with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind ephemeral port")?;
        let addr = listener.local_addr().context("local_addr")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let task = tokio::spawn(async move { server.await });

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests observed so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.seen.lock().clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.seen.lock().last().cloned()
    }

    /// Stop the server and wait for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the server task panicked or failed.
    pub async fn stop(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.context("mock server task join")??;
        }
        Ok(())
    }
}

impl Drop for MockFmp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().to_string();
    state.seen.lock().push(RecordedRequest {
        path: path.clone(),
        query: params,
    });

    match state.routes.get(&path) {
        Some((status, body)) => {
            let status =
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, axum::Json(body.clone())).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "Error Message": format!("no stub for {path}") })),
        )
            .into_response(),
    }
}
