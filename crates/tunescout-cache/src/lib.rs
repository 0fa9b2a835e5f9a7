// SQLite-based search cache
// Keeps upstream API quota down; entries age out after a fixed TTL

pub mod cache;

pub use cache::{CacheEntry, CacheError, CacheManager, CacheStats, DEFAULT_TTL_SECS};
