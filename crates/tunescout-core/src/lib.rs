// Core logic: result model, providers, the cached engine, and the
// fallback orchestration the UI runs on
pub mod config;
pub mod error;
pub mod export;
pub mod fallback;
pub mod models;
pub mod providers;
pub mod search;
pub mod search_with_cache;

pub use config::Config;
pub use error::Error;
pub use export::{ExportFormat, Exporter};
pub use fallback::{
    FallbackReason, FetchError, SearchBackend, SearchMode, SearchOrchestrator, SessionState, Tab,
    Timeouts,
};
pub use models::{SearchOutcome, SearchResult, Source};
pub use search::SearchProvider;
pub use search_with_cache::CachedSearchEngine;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
