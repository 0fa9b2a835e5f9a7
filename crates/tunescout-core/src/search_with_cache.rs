// Search engine with caching support
use crate::{
    models::{SearchOutcome, SearchResult, Source},
    search::SearchProvider,
    Error, Result,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tunescout_cache::CacheManager;

/// Search engine that checks the cache before hitting the upstream APIs
pub struct CachedSearchEngine {
    providers: Vec<Box<dyn SearchProvider>>,
    cache: Option<Arc<CacheManager>>,
}

impl CachedSearchEngine {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            cache: None,
        }
    }

    pub fn with_cache(cache: Arc<CacheManager>) -> Self {
        Self {
            providers: Vec::new(),
            cache: Some(cache),
        }
    }

    /// Register a provider; a later provider for the same source wins
    pub fn add_provider(&mut self, provider: Box<dyn SearchProvider>) {
        let source = provider.source();
        self.providers.retain(|p| p.source() != source);
        self.providers.push(provider);
    }

    /// Cache key layout shared with everything that ever wrote this cache
    pub fn cache_key(source: Source, query: &str) -> String {
        format!("{}:{}", source.as_str(), query)
    }

    /// Search one source with a cache-first strategy
    ///
    /// A blank query falls back to the source's default query. Cache read
    /// and write failures are logged and otherwise ignored; a provider
    /// failure is returned to the caller.
    pub async fn search(&self, source: Source, query: &str) -> Result<SearchOutcome> {
        let query = match query.trim() {
            "" => source.default_query(),
            q => q,
        };
        let key = Self::cache_key(source, query);

        if let Some(cache) = &self.cache {
            debug!("Checking cache for {}", key);
            match cache.get::<SearchResult>(&key, source.as_str()) {
                Ok(Some(entry)) => {
                    info!("Cache hit for {} ({} results)", key, entry.results.len());
                    return Ok(SearchOutcome {
                        results: entry.results,
                        cached: true,
                    });
                }
                Ok(None) => debug!("Cache miss for {}", key),
                Err(e) => warn!("Error reading cache: {}", e),
            }
        }

        let provider = self
            .providers
            .iter()
            .find(|p| p.source() == source)
            .ok_or(Error::NoProvider(source))?;

        info!("Fetching {} from {}", query, source);
        let results = provider.search(query).await.map_err(|e| {
            error!("{} API error: {}", source, e);
            e
        })?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, source.as_str(), &results) {
                warn!("Error writing cache: {}", e);
            }
        }

        Ok(SearchOutcome {
            results,
            cached: false,
        })
    }
}

impl Default for CachedSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
