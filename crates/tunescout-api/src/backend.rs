// Client for our own search API (the thing the server crate exposes).
// Used by the UI side; every call carries its own timeout because a slow
// source is how "blocked" shows up in practice.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to fetch: {0}")]
    Network(String),

    #[error("API returned {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Wire shape of `GET /api/{source}/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSearchResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub cached: bool,
}

#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    api_base: String,
}

impl BackendClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// `GET {api_base}/{source}/search?q=...` bounded by `timeout`
    pub async fn search<T: DeserializeOwned>(
        &self,
        source: &str,
        query: &str,
        timeout: Duration,
    ) -> Result<ApiSearchResponse<T>, BackendError> {
        let url = format!("{}/{}/search", self.api_base, source);
        debug!("GET {} q={:?} (timeout {:?})", url, query, timeout);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify(e, timeout))?;

        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else if err.is_decode() {
        BackendError::Decode(err.to_string())
    } else {
        BackendError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    #[tokio::test]
    async fn test_search_decodes_results() {
        let router = Router::new().route(
            "/api/jamendo/search",
            get(|| async { Json(serde_json::json!({ "results": ["a", "b"], "cached": true })) }),
        );
        let client = BackendClient::new(spawn_stub(router).await);

        let resp: ApiSearchResponse<String> = client
            .search("jamendo", "lofi", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(resp.results, vec!["a", "b"]);
        assert!(resp.cached);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/api/youtube/search",
            get(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "YouTube fetch failed" })),
                )
            }),
        );
        let client = BackendClient::new(spawn_stub(router).await);

        let err = client
            .search::<String>("youtube", "x", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Status(500)));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let router = Router::new().route(
            "/api/youtube/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(serde_json::json!({ "results": [], "cached": false }))
            }),
        );
        let client = BackendClient::new(spawn_stub(router).await);

        let err = client
            .search::<String>("youtube", "x", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Port 9 (discard) is never served in CI
        let client = BackendClient::new("http://127.0.0.1:9/api");
        let err = client
            .search::<String>("youtube", "x", Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
    }
}
