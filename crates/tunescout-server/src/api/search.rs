//! Search routes
//!
//! `GET /api/youtube/search?q=` and `GET /api/jamendo/search?q=` both answer
//! `{results, cached}`. A missing or blank `q` searches the source's default
//! query.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use tunescout_core::{SearchOutcome, Source};

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/youtube/search
pub async fn youtube_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, SearchError> {
    run_search(&state, Source::YouTube, params).await
}

/// GET /api/jamendo/search
pub async fn jamendo_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchOutcome>, SearchError> {
    run_search(&state, Source::Jamendo, params).await
}

async fn run_search(
    state: &AppState,
    source: Source,
    params: SearchParams,
) -> Result<Json<SearchOutcome>, SearchError> {
    let query = params.q.unwrap_or_default();

    state
        .engine
        .search(source, &query)
        .await
        .map(Json)
        .map_err(|e| {
            error!("{} API Error: {}", source, e);
            SearchError::Upstream(source)
        })
}

/// Upstream failure; the body names the source, details stay in the log
#[derive(Debug)]
pub enum SearchError {
    Upstream(Source),
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let SearchError::Upstream(source) = self;
        let body = Json(json!({
            "error": format!("{} fetch failed", source),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
