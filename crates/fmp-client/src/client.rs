//! HTTP client for the Financial Modeling Prep REST API.
//!
//! Each public method maps to one REST endpoint and performs a single
//! authenticated GET. FMP answers with a JSON array on most endpoints and a
//! bare object on a few; responses are normalized to `Vec<Value>` so callers
//! always see rows.

use crate::config::FmpConfig;
use crate::error::{FmpError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Reporting period accepted by the statement, metrics, and ratio endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Annual,
    Quarter,
}

impl Period {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = FmpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "annual" => Ok(Self::Annual),
            "quarter" => Ok(Self::Quarter),
            other => Err(FmpError::Config(format!(
                "Invalid period '{other}': expected 'annual' or 'quarter'"
            ))),
        }
    }
}

// Bound on the upstream body echoed into `FmpError::Api`.
const MAX_ERROR_BODY: usize = 2048;

#[derive(Clone)]
pub struct FmpClient {
    inner: Arc<FmpClientInner>,
}

struct FmpClientInner {
    config: FmpConfig,
    http: Client,
}

impl FmpClient {
    /// Build a client from a config.
    ///
    /// The resulting instance is cheap to clone and safe to share across
    /// tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: FmpConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FmpError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(FmpClientInner { config, http }),
        })
    }

    /// Build a client from `FMP_API_KEY` / `FMP_BASE_URL` / `FMP_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is missing the API key or holds
    /// invalid values.
    pub fn from_env() -> Result<Self> {
        Self::new(FmpConfig::from_env()?)
    }

    /// Company profile (`profile/{symbol}`).
    pub async fn company_profile(&self, symbol: &str) -> Result<Vec<Value>> {
        self.get_rows(&["profile", symbol], &[]).await
    }

    /// Real-time quote (`quote/{symbol}`).
    pub async fn quote(&self, symbol: &str) -> Result<Vec<Value>> {
        self.get_rows(&["quote", symbol], &[]).await
    }

    /// Income statement rows (`income-statement/{symbol}`).
    pub async fn income_statement(
        &self,
        symbol: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Value>> {
        self.get_rows(&["income-statement", symbol], &period_params(period, limit))
            .await
    }

    /// Balance sheet rows (`balance-sheet-statement/{symbol}`).
    pub async fn balance_sheet(
        &self,
        symbol: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Value>> {
        self.get_rows(
            &["balance-sheet-statement", symbol],
            &period_params(period, limit),
        )
        .await
    }

    /// Cash flow statement rows (`cash-flow-statement/{symbol}`).
    pub async fn cash_flow(&self, symbol: &str, period: Period, limit: u32) -> Result<Vec<Value>> {
        self.get_rows(
            &["cash-flow-statement", symbol],
            &period_params(period, limit),
        )
        .await
    }

    /// Key financial metrics (`key-metrics/{symbol}`).
    pub async fn key_metrics(
        &self,
        symbol: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Value>> {
        self.get_rows(&["key-metrics", symbol], &period_params(period, limit))
            .await
    }

    /// Financial ratios (`ratios/{symbol}`).
    pub async fn financial_ratios(
        &self,
        symbol: &str,
        period: Period,
        limit: u32,
    ) -> Result<Vec<Value>> {
        self.get_rows(&["ratios", symbol], &period_params(period, limit))
            .await
    }

    /// Discounted cash flow valuation (`discounted-cash-flow/{symbol}`).
    pub async fn dcf_valuation(&self, symbol: &str) -> Result<Vec<Value>> {
        self.get_rows(&["discounted-cash-flow", symbol], &[]).await
    }

    /// Financial health score (`score/{symbol}`).
    pub async fn financial_score(&self, symbol: &str) -> Result<Vec<Value>> {
        self.get_rows(&["score", symbol], &[]).await
    }

    /// Market capitalization (`market-capitalization/{symbol}`).
    pub async fn market_cap(&self, symbol: &str) -> Result<Vec<Value>> {
        self.get_rows(&["market-capitalization", symbol], &[]).await
    }

    /// Search companies by name or ticker (`search`).
    pub async fn search_companies(&self, query: &str, limit: u32) -> Result<Vec<Value>> {
        self.get_rows(
            &["search"],
            &[
                ("query", query.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Per-sector performance snapshot (`sector-performance`).
    pub async fn sector_performance(&self) -> Result<Vec<Value>> {
        self.get_rows(&["sector-performance"], &[]).await
    }

    async fn get_rows(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Vec<Value>> {
        let url = self.endpoint_url(segments, params)?;
        debug!(path = %url.path(), "FMP request");

        let response = self.inner.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), path = %segments.join("/"), "FMP request failed");
            return Err(FmpError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: truncate_error_body(&body),
            });
        }

        let text = response.text().await?;
        let body: Value =
            serde_json::from_str(&text).map_err(|e| FmpError::Decode(e.to_string()))?;
        Ok(ensure_rows(body))
    }

    fn endpoint_url(&self, segments: &[&str], params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.inner.config.base_url.clone();

        {
            // Segment-wise push so symbols like `BRK.B` (or anything containing
            // `/`) are percent-encoded instead of splitting the path.
            let mut path = url
                .path_segments_mut()
                .map_err(|()| FmpError::Config("Base URL cannot carry path segments".to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("apikey", &self.inner.config.api_key);
        }

        Ok(url)
    }
}

fn period_params(period: Period, limit: u32) -> [(&'static str, String); 2] {
    [
        ("period", period.as_str().to_string()),
        ("limit", limit.to_string()),
    ]
}

// FMP returns a bare object on some endpoints and a one-row array on others;
// normalize so callers always iterate rows.
fn ensure_rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        other => vec![other],
    }
}

fn truncate_error_body(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_BODY).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::{FmpClient, Period, ensure_rows};
    use crate::config::FmpConfig;
    use crate::error::FmpError;
    use axum::Router;
    use axum::http::{StatusCode, Uri};
    use axum::routing::any;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    struct EchoServer {
        base_url: String,
        shutdown: oneshot::Sender<()>,
        handle: JoinHandle<std::io::Result<()>>,
    }

    impl EchoServer {
        async fn stop(self) {
            let _ = self.shutdown.send(());
            self.handle
                .await
                .expect("server task join")
                .expect("server result");
        }
    }

    // Echoes the request path and raw query back as a JSON object.
    async fn spawn_echo() -> EchoServer {
        async fn echo_handler(uri: Uri) -> axum::Json<Value> {
            axum::Json(json!({
                "path": uri.path(),
                "query": uri.query().unwrap_or(""),
            }))
        }

        let app = Router::new().route("/{*path}", any(echo_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        EchoServer {
            base_url: format!("http://{addr}"),
            shutdown: shutdown_tx,
            handle,
        }
    }

    fn client_for(base_url: &str) -> FmpClient {
        let config =
            FmpConfig::new("test-key", base_url, Duration::from_secs(5)).expect("valid config");
        FmpClient::new(config).expect("client")
    }

    fn parse_query(row: &Value) -> HashMap<String, String> {
        let query = row["query"].as_str().expect("query echoed");
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[tokio::test]
    async fn request_carries_path_params_and_api_key() {
        let server = spawn_echo().await;
        let client = client_for(&server.base_url);

        let rows = client
            .income_statement("AAPL", Period::Quarter, 3)
            .await
            .expect("rows");
        assert_eq!(rows.len(), 1, "object response wraps into one row");

        assert_eq!(rows[0]["path"], "/income-statement/AAPL");
        let query = parse_query(&rows[0]);
        assert_eq!(query.get("period").map(String::as_str), Some("quarter"));
        assert_eq!(query.get("limit").map(String::as_str), Some("3"));
        assert_eq!(query.get("apikey").map(String::as_str), Some("test-key"));

        server.stop().await;
    }

    #[tokio::test]
    async fn search_uses_query_params_only() {
        let server = spawn_echo().await;
        let client = client_for(&server.base_url);

        let rows = client.search_companies("Apple Inc", 10).await.expect("rows");
        assert_eq!(rows[0]["path"], "/search");
        let query = parse_query(&rows[0]);
        assert_eq!(query.get("query").map(String::as_str), Some("Apple Inc"));
        assert_eq!(query.get("limit").map(String::as_str), Some("10"));

        server.stop().await;
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_preserved() {
        let server = spawn_echo().await;
        let client = client_for(&format!("{}/api/v3", server.base_url));

        let rows = client.quote("MSFT").await.expect("rows");
        assert_eq!(rows[0]["path"], "/api/v3/quote/MSFT");

        server.stop().await;
    }

    #[tokio::test]
    async fn symbol_is_percent_encoded_into_one_segment() {
        let server = spawn_echo().await;
        let client = client_for(&server.base_url);

        let rows = client.company_profile("BRK/B").await.expect("rows");
        assert_eq!(rows[0]["path"], "/profile/BRK%2FB");

        server.stop().await;
    }

    #[tokio::test]
    async fn array_responses_pass_through_as_rows() {
        async fn rows_handler() -> axum::Json<Value> {
            axum::Json(json!([{ "sector": "Energy" }, { "sector": "Utilities" }]))
        }

        let app = Router::new().route("/{*path}", any(rows_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        let client = client_for(&format!("http://{addr}"));
        let rows = client.sector_performance().await.expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["sector"], "Energy");

        let _ = shutdown_tx.send(());
        handle.await.expect("join").expect("serve");
    }

    #[tokio::test]
    async fn non_2xx_maps_to_api_error() {
        async fn not_found_handler() -> (StatusCode, axum::Json<Value>) {
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({ "Error Message": "Invalid symbol" })),
            )
        }

        let app = Router::new().route("/{*path}", any(not_found_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        let client = client_for(&format!("http://{addr}"));
        let err = client.quote("NOPE").await.unwrap_err();
        match &err {
            FmpError::Api { status, body, .. } => {
                assert_eq!(*status, 404);
                assert!(body.contains("Invalid symbol"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert!(err.to_string().contains("404"));

        let _ = shutdown_tx.send(());
        handle.await.expect("join").expect("serve");
    }

    #[tokio::test]
    async fn invalid_json_maps_to_decode_error() {
        async fn text_handler() -> &'static str {
            "service unavailable, try later"
        }

        let app = Router::new().route("/{*path}", any(text_handler));
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let handle = tokio::spawn(async move { server.await });

        let client = client_for(&format!("http://{addr}"));
        let err = client.dcf_valuation("AAPL").await.unwrap_err();
        assert!(matches!(err, FmpError::Decode(_)));

        let _ = shutdown_tx.send(());
        handle.await.expect("join").expect("serve");
    }

    #[tokio::test]
    async fn transport_errors_never_leak_the_api_key() {
        // Nothing listens on port 1; the connect error embeds the request URL.
        let client = client_for("http://127.0.0.1:1");
        let err = client.quote("AAPL").await.unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, FmpError::Transport(_)));
        assert!(!msg.contains("test-key"), "redacted message: {msg}");
    }

    #[test]
    fn period_parses_and_displays() {
        assert_eq!("annual".parse::<Period>().expect("annual"), Period::Annual);
        assert_eq!(
            "quarter".parse::<Period>().expect("quarter"),
            Period::Quarter
        );
        assert!("monthly".parse::<Period>().is_err());
        assert_eq!(Period::Quarter.to_string(), "quarter");
        assert_eq!(Period::default(), Period::Annual);
    }

    #[test]
    fn ensure_rows_wraps_objects_and_passes_arrays() {
        assert_eq!(ensure_rows(json!({"a": 1})), vec![json!({"a": 1})]);
        assert_eq!(
            ensure_rows(json!([{"a": 1}, {"b": 2}])),
            vec![json!({"a": 1}), json!({"b": 2})]
        );
        assert!(ensure_rows(json!([])).is_empty());
    }
}
