//! Integration tests for the search API routes
//!
//! Providers are replaced with in-process fakes so the tests cover routing,
//! cache behavior and error mapping without touching the network.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`
use tunescout_cache::{CacheManager, DEFAULT_TTL_SECS};
use tunescout_core::{CachedSearchEngine, Error, SearchProvider, SearchResult, Source};
use tunescout_server::{build_router, AppState};

struct FakeProvider {
    source: Source,
    calls: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<Option<String>>>,
    fail: bool,
}

#[async_trait]
impl SearchProvider for FakeProvider {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(&self, query: &str) -> tunescout_core::Result<Vec<SearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        if self.fail {
            return Err(Error::ConfigError("quota exceeded".into()));
        }
        Ok(vec![SearchResult {
            id: "abc".into(),
            title: format!("{} result", query),
            source: self.source,
            thumbnail: None,
            channel: None,
            artwork: Some("https://img".into()),
            artist: Some("someone".into()),
            stream_url: Some("https://stream".into()),
            license: None,
        }])
    }
}

struct Harness {
    app: axum::Router,
    cache: Arc<CacheManager>,
    calls: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<Option<String>>>,
}

fn setup(source: Source, fail: bool) -> Harness {
    let cache = Arc::new(CacheManager::in_memory(DEFAULT_TTL_SECS).unwrap());
    let calls = Arc::new(AtomicUsize::new(0));
    let last_query = Arc::new(std::sync::Mutex::new(None));

    let mut engine = CachedSearchEngine::with_cache(cache.clone());
    engine.add_provider(Box::new(FakeProvider {
        source,
        calls: calls.clone(),
        last_query: last_query.clone(),
        fail,
    }));

    Harness {
        app: build_router(AppState::new(Arc::new(engine))),
        cache,
        calls,
        last_query,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Status endpoints
// =============================================================================

#[tokio::test]
async fn test_root_reports_running() {
    let h = setup(Source::YouTube, false);
    let response = h.app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_health_endpoint() {
    let h = setup(Source::YouTube, false);
    let response = h.app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// =============================================================================
// Search routes
// =============================================================================

#[tokio::test]
async fn test_first_search_is_fresh_second_is_cached() {
    let h = setup(Source::Jamendo, false);

    let response = h
        .app
        .clone()
        .oneshot(get("/api/jamendo/search?q=jazz"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["cached"], false);
    assert_eq!(body["results"][0]["source"], "jamendo");
    assert_eq!(body["results"][0]["streamUrl"], "https://stream");

    let response = h
        .app
        .oneshot(get("/api/jamendo/search?q=jazz"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["cached"], true);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_hit_never_contacts_provider() {
    let h = setup(Source::YouTube, true);
    let stored = vec![SearchResult {
        id: "vid".into(),
        title: "Cached".into(),
        source: Source::YouTube,
        thumbnail: Some("https://thumb".into()),
        channel: Some("chan".into()),
        artwork: None,
        artist: None,
        stream_url: None,
        license: None,
    }];
    h.cache
        .set("youtube:Pasoori", "youtube", &stored)
        .unwrap();

    let response = h
        .app
        .oneshot(get("/api/youtube/search?q=Pasoori"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["cached"], true);
    assert_eq!(body["results"][0]["id"], "vid");
    assert_eq!(h.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_week_old_entry_is_refetched() {
    let h = setup(Source::YouTube, false);
    h.cache
        .set_at::<SearchResult>(
            "youtube:old",
            "youtube",
            &[],
            Utc::now() - Duration::seconds(DEFAULT_TTL_SECS + 60),
        )
        .unwrap();

    let response = h
        .app
        .oneshot(get("/api/youtube/search?q=old"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["cached"], false);
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_query_uses_default() {
    let h = setup(Source::YouTube, false);
    let response = h.app.oneshot(get("/api/youtube/search")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        h.last_query.lock().unwrap().as_deref(),
        Some("Coke Studio Pakistan")
    );
}

#[tokio::test]
async fn test_upstream_failure_returns_500() {
    let h = setup(Source::YouTube, true);
    let response = h
        .app
        .oneshot(get("/api/youtube/search?q=x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "YouTube fetch failed");
}

#[tokio::test]
async fn test_unconfigured_source_returns_500() {
    // Only YouTube is wired up
    let h = setup(Source::YouTube, false);
    let response = h
        .app
        .oneshot(get("/api/jamendo/search?q=x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Jamendo fetch failed");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let h = setup(Source::Jamendo, false);
    let request = Request::builder()
        .method("GET")
        .uri("/api/jamendo/search?q=x")
        .header("Origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = h.app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
