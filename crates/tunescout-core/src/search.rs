use crate::{
    models::{SearchResult, Source},
    Result,
};

/// Trait for search providers - one per upstream catalog
///
/// Keeps the engine and the HTTP layer ignorant of which API sits behind a
/// source, and lets tests swap in canned providers.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn source(&self) -> Source;
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}
