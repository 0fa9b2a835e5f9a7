//! tunescout-server - HTTP front for the cached music search
//!
//! Two search routes, one per catalog, each answering from the SQLite cache
//! when it can and from the upstream API otherwise.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tunescout_api::{JamendoClient, YouTubeClient};
use tunescout_cache::CacheManager;
use tunescout_core::{
    providers::{JamendoProvider, YouTubeProvider},
    CachedSearchEngine, Config,
};

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CachedSearchEngine>,
}

impl AppState {
    pub fn new(engine: Arc<CachedSearchEngine>) -> Self {
        Self { engine }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let search = Router::new()
        .route("/youtube/search", get(api::youtube_search))
        .route("/jamendo/search", get(api::jamendo_search));

    Router::new()
        .nest("/api", search)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Open (creating if needed) the cache database named by the config
pub fn open_cache(config: &Config) -> anyhow::Result<Arc<CacheManager>> {
    let db_path = config.cache.resolved_db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    info!("Cache database: {}", db_path.display());
    let cache = CacheManager::new(&db_path, config.cache.ttl_secs)?;
    Ok(Arc::new(cache))
}

/// Wire both providers into a cache-first engine
pub fn build_engine(config: &Config, cache: Option<Arc<CacheManager>>) -> CachedSearchEngine {
    let mut engine = match cache {
        Some(cache) => CachedSearchEngine::with_cache(cache),
        None => CachedSearchEngine::new(),
    };

    let youtube = YouTubeClient::with_base_url(
        config.youtube.api_key.clone(),
        config.youtube.api_url.clone(),
    );
    if !youtube.has_api_key() {
        warn!("YOUTUBE_API_KEYS not set; YouTube searches will fail");
    }
    engine.add_provider(Box::new(YouTubeProvider::new(
        youtube,
        config.youtube.max_results,
    )));

    let jamendo = JamendoClient::with_base_url(
        config.jamendo.client_id.clone(),
        config.jamendo.api_url.clone(),
    );
    if !jamendo.has_client_id() {
        warn!("JAMENDO_CLIENT_ID not set; Jamendo searches will fail");
    }
    engine.add_provider(Box::new(JamendoProvider::new(jamendo, config.jamendo.limit)));

    engine
}

/// Periodically drop expired cache rows, the job a TTL index would do
pub fn spawn_cache_sweeper(cache: Arc<CacheManager>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match cache.purge_expired() {
                Ok(0) => {}
                Ok(n) => info!("Expired {} cached searches", n),
                Err(e) => warn!("Cache sweep failed: {}", e),
            }
        }
    })
}

/// Run the HTTP server until Ctrl-C
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let cache = open_cache(&config)?;
    let sweeper = spawn_cache_sweeper(
        cache.clone(),
        Duration::from_secs(config.cache.purge_interval_secs.max(1)),
    );

    let engine = build_engine(&config, Some(cache));
    let app = build_router(AppState::new(Arc::new(engine)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    sweeper.abort();
    Ok(())
}
