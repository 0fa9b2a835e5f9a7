// Search orchestration for the UI side.
//
// YouTube is the primary source. When it times out, can't be reached,
// answers with an error, or comes back empty, the same query goes to
// Jamendo and the UI is told it is looking at fallback results. Dual mode
// skips the chain and asks both sources at once.
use crate::{
    models::{SearchResult, Source},
    search_with_cache::CachedSearchEngine,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use tunescout_api::{BackendClient, BackendError};

pub const MSG_NOTHING_ANYWHERE: &str =
    "No results found on YouTube or Jamendo. Try a different search.";
pub const MSG_UNREACHABLE: &str = "Unable to search music. Please check your internet connection and ensure the backend server is running.";
pub const MSG_NOTHING_ON_JAMENDO: &str = "No results found on Jamendo. Try a different search.";
pub const MSG_JAMENDO_FAILED: &str = "Failed to search Jamendo. Please try again.";

/// Why a fetch didn't produce results
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to fetch: {0}")]
    Unavailable(String),

    #[error("API returned {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Timeouts and connection failures are what a blocked source looks like
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Unavailable(_))
    }
}

impl From<BackendError> for FetchError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout(d) => FetchError::Timeout(d),
            BackendError::Network(msg) => FetchError::Unavailable(msg),
            BackendError::Status(code) => FetchError::Status(code),
            BackendError::Decode(msg) => FetchError::Decode(msg),
        }
    }
}

/// Anything that can answer "search `source` for `query`"
///
/// The orchestrator enforces `timeout` itself; implementations may use it
/// to bound their own I/O as well.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch(
        &self,
        source: Source,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SearchResult>, FetchError>;
}

/// Talks to the search API over HTTP
#[async_trait]
impl SearchBackend for BackendClient {
    async fn fetch(
        &self,
        source: Source,
        query: &str,
        timeout: Duration,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let response = self
            .search::<SearchResult>(source.as_str(), query, timeout)
            .await?;
        Ok(response.results)
    }
}

/// Runs the engine in-process, no server in between
#[async_trait]
impl SearchBackend for CachedSearchEngine {
    async fn fetch(
        &self,
        source: Source,
        query: &str,
        _timeout: Duration,
    ) -> Result<Vec<SearchResult>, FetchError> {
        self.search(source, query)
            .await
            .map(|outcome| outcome.results)
            .map_err(|e| FetchError::Unavailable(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub youtube: Duration,
    pub jamendo: Duration,
}

impl Timeouts {
    pub fn for_source(&self, source: Source) -> Duration {
        match source {
            Source::YouTube => self.youtube,
            Source::Jamendo => self.jamendo,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            youtube: Duration::from_secs(8),
            jamendo: Duration::from_secs(10),
        }
    }
}

/// Result tab. `All` only makes sense after a dual search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    YouTube,
    Jamendo,
    All,
}

impl From<Source> for Tab {
    fn from(source: Source) -> Self {
        match source {
            Source::YouTube => Tab::YouTube,
            Source::Jamendo => Tab::Jamendo,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::YouTube => write!(f, "YouTube"),
            Tab::Jamendo => write!(f, "Jamendo"),
            Tab::All => write!(f, "All"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Single,
    Dual,
}

/// Why YouTube results were replaced by Jamendo ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Timed out or never connected: most likely blocked on this network
    Unreachable,
    /// The API answered, but with an error
    Failed(String),
    /// The API answered with zero results
    NoResults,
}

impl FallbackReason {
    fn from_fetch(err: &FetchError) -> Self {
        if err.is_unreachable() {
            FallbackReason::Unreachable
        } else {
            FallbackReason::Failed(err.to_string())
        }
    }
}

/// Everything the UI renders from
#[derive(Debug, Clone)]
pub struct SessionState {
    pub query: String,
    pub youtube_results: Vec<SearchResult>,
    pub jamendo_results: Vec<SearchResult>,
    pub current: Option<SearchResult>,
    pub loading: bool,
    pub active_tab: Tab,
    pub error: Option<String>,
    pub is_fallback: bool,
    pub fallback_reason: Option<FallbackReason>,
    pub mode: SearchMode,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: Source::YouTube.default_query().to_string(),
            youtube_results: Vec::new(),
            jamendo_results: Vec::new(),
            current: None,
            loading: false,
            active_tab: Tab::YouTube,
            error: None,
            is_fallback: false,
            fallback_reason: None,
            mode: SearchMode::Single,
        }
    }
}

impl SessionState {
    /// Results for the active tab; `All` is YouTube followed by Jamendo
    pub fn current_results(&self) -> Vec<&SearchResult> {
        match self.active_tab {
            Tab::YouTube => self.youtube_results.iter().collect(),
            Tab::Jamendo => self.jamendo_results.iter().collect(),
            Tab::All => self
                .youtube_results
                .iter()
                .chain(self.jamendo_results.iter())
                .collect(),
        }
    }

    /// (youtube, jamendo, all) counts for the dual-mode tab strip
    pub fn result_counts(&self) -> (usize, usize, usize) {
        let yt = self.youtube_results.len();
        let jm = self.jamendo_results.len();
        (yt, jm, yt + jm)
    }

    pub fn has_any_results(&self) -> bool {
        !self.youtube_results.is_empty() || !self.jamendo_results.is_empty()
    }

    /// Manual tab switch clears any notice left by the last search
    pub fn select_source(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.is_fallback = false;
        self.fallback_reason = None;
        self.error = None;
    }

    /// Dual-mode tab strip: switches the view, keeps notices
    pub fn show_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
        if mode == SearchMode::Single {
            self.select_source(Tab::YouTube);
        }
    }

    /// Start playing the n-th entry of the active tab
    ///
    /// An index past the end leaves the current track playing.
    pub fn play(&mut self, index: usize) -> Option<&SearchResult> {
        let picked = self.current_results().get(index).map(|r| (*r).clone())?;
        self.current = Some(picked);
        self.current.as_ref()
    }

    pub fn now_playing(&self) -> Option<&SearchResult> {
        self.current.as_ref()
    }

    pub fn is_playing(&self, result: &SearchResult) -> bool {
        self.current
            .as_ref()
            .is_some_and(|c| c.id == result.id && c.source == result.source)
    }

    fn begin(&mut self) {
        self.loading = true;
        self.youtube_results.clear();
        self.jamendo_results.clear();
        self.error = None;
        self.is_fallback = false;
        self.fallback_reason = None;
    }
}

/// Suggestion chips shown while a tab has nothing to display
pub fn quick_searches(tab: Tab) -> &'static [&'static str] {
    match tab {
        Tab::YouTube | Tab::All => &[
            "Coke Studio",
            "Arijit Singh",
            "Atif Aslam",
            "AR Rahman",
            "Bollywood Hits",
        ],
        Tab::Jamendo => &["Lo-fi Beats", "Jazz", "Acoustic", "Electronic", "Classical"],
    }
}

/// Drives searches against a backend and keeps the UI state current
pub struct SearchOrchestrator<B> {
    backend: B,
    timeouts: Timeouts,
    state: SessionState,
}

impl<B: SearchBackend> SearchOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self::with_timeouts(backend, Timeouts::default())
    }

    pub fn with_timeouts(backend: B, timeouts: Timeouts) -> Self {
        Self {
            backend,
            timeouts,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
    }

    pub fn select_source(&mut self, tab: Tab) {
        self.state.select_source(tab);
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.state.set_mode(mode);
    }

    /// Fetch with the per-source deadline; empty results are still `Ok`
    async fn fetch_with_timeout(
        &self,
        source: Source,
        query: &str,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let timeout = self.timeouts.for_source(source);
        match tokio::time::timeout(timeout, self.backend.fetch(source, query, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        }
    }

    /// Main entry point
    ///
    /// `manual_source` is the tab the user explicitly searched from; without
    /// one the active tab decides. Anything other than Jamendo starts with
    /// YouTube and falls back.
    pub async fn search(&mut self, manual_source: Option<Tab>) {
        if self.state.query.trim().is_empty() {
            return;
        }

        if self.state.mode == SearchMode::Dual {
            return self.search_both().await;
        }

        self.state.begin();
        let query = self.state.query.clone();

        match manual_source.unwrap_or(self.state.active_tab) {
            Tab::Jamendo => self.search_jamendo_only(&query).await,
            Tab::YouTube | Tab::All => self.search_with_fallback(&query).await,
        }

        self.state.loading = false;
    }

    async fn search_with_fallback(&mut self, query: &str) {
        info!("Attempting YouTube search for {:?}", query);
        let reason = match self.fetch_with_timeout(Source::YouTube, query).await {
            Ok(results) if !results.is_empty() => {
                info!("YouTube search successful ({} results)", results.len());
                self.state.youtube_results = results;
                self.state.active_tab = Tab::YouTube;
                return;
            }
            Ok(_) => {
                warn!("YouTube returned empty results, trying fallback");
                FallbackReason::NoResults
            }
            Err(e) => {
                error!("YouTube failed: {}", e);
                FallbackReason::from_fetch(&e)
            }
        };

        match reason {
            FallbackReason::Unreachable => {
                info!("YouTube appears blocked or unavailable, falling back to Jamendo")
            }
            _ => info!("YouTube error, falling back to Jamendo"),
        }
        self.state.is_fallback = true;
        self.state.fallback_reason = Some(reason);

        match self.fetch_with_timeout(Source::Jamendo, query).await {
            Ok(results) if !results.is_empty() => {
                info!("Jamendo fallback successful ({} results)", results.len());
                self.state.jamendo_results = results;
                self.state.active_tab = Tab::Jamendo;
                self.state.error = None;
            }
            Ok(_) => {
                self.state.error = Some(MSG_NOTHING_ANYWHERE.to_string());
            }
            Err(e) => {
                error!("Jamendo also failed: {}", e);
                self.state.error = Some(MSG_UNREACHABLE.to_string());
            }
        }
    }

    async fn search_jamendo_only(&mut self, query: &str) {
        info!("Searching Jamendo for {:?}", query);
        match self.fetch_with_timeout(Source::Jamendo, query).await {
            Ok(results) if !results.is_empty() => {
                info!("Jamendo search successful ({} results)", results.len());
                self.state.jamendo_results = results;
                self.state.active_tab = Tab::Jamendo;
            }
            Ok(_) => {
                self.state.error = Some(MSG_NOTHING_ON_JAMENDO.to_string());
            }
            Err(e) => {
                error!("Jamendo search failed: {}", e);
                self.state.error = Some(MSG_JAMENDO_FAILED.to_string());
            }
        }
    }

    /// Query both sources concurrently; each settles on its own
    pub async fn search_both(&mut self) {
        if self.state.query.trim().is_empty() {
            return;
        }

        self.state.begin();
        let query = self.state.query.clone();

        let (youtube, jamendo) = futures::future::join(
            self.fetch_with_timeout(Source::YouTube, &query),
            self.fetch_with_timeout(Source::Jamendo, &query),
        )
        .await;

        let youtube_reason = match &youtube {
            Ok(results) if results.is_empty() => Some(FallbackReason::NoResults),
            Ok(_) => None,
            Err(e) => {
                warn!("YouTube side of dual search failed: {}", e);
                Some(FallbackReason::from_fetch(e))
            }
        };
        if let Err(e) = &jamendo {
            warn!("Jamendo side of dual search failed: {}", e);
        }
        let jamendo_failed = jamendo.is_err();

        if let Ok(results) = youtube {
            self.state.youtube_results = results;
        }
        if let Ok(results) = jamendo {
            self.state.jamendo_results = results;
        }

        if !self.state.youtube_results.is_empty() {
            self.state.active_tab = Tab::YouTube;
        } else if !self.state.jamendo_results.is_empty() {
            self.state.active_tab = Tab::Jamendo;
            self.state.is_fallback = true;
            self.state.fallback_reason = youtube_reason;
        } else if jamendo_failed {
            // Same outcome as a failed fallback in single mode
            self.state.error = Some(MSG_UNREACHABLE.to_string());
        } else {
            self.state.error = Some(MSG_NOTHING_ANYWHERE.to_string());
        }

        self.state.loading = false;
    }
}
