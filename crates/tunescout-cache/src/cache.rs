use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Seven days, same retention the search results were always kept for
pub const DEFAULT_TTL_SECS: i64 = 604_800;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cached payload is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache connection poisoned by a panicked writer")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// One cached search: the query, where it came from, and what it returned
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub query: String,
    pub source: String,
    pub results: Vec<T>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub expired: usize,
    pub by_source: BTreeMap<String, usize>,
}

/// Search cache backed by a single SQLite table
///
/// Expiry works like a TTL index: reads never see rows older than the TTL,
/// and `purge_expired` physically removes them. The connection lives behind
/// a mutex so the manager can be shared across request handlers.
pub struct CacheManager {
    conn: Mutex<Connection>,
    ttl: Duration,
}

impl CacheManager {
    pub fn new<P: AsRef<Path>>(db_path: P, ttl_secs: i64) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn, ttl_secs)
    }

    /// Throwaway cache, mostly for tests and `--no-cache` style runs
    pub fn in_memory(ttl_secs: i64) -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, ttl_secs)
    }

    fn from_connection(conn: Connection, ttl_secs: i64) -> Result<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl: Duration::seconds(ttl_secs),
        })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS search_cache (
                id INTEGER PRIMARY KEY,
                query TEXT NOT NULL,
                source TEXT NOT NULL,
                results TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                UNIQUE(query, source)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_search_cache_created_at
             ON search_cache(created_at)",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }

    fn cutoff(&self, now: DateTime<Utc>) -> i64 {
        (now - self.ttl).timestamp()
    }

    /// Look up a live entry. Expired rows are treated as absent even if
    /// the purge hasn't run yet.
    pub fn get<T: DeserializeOwned>(&self, query: &str, source: &str) -> Result<Option<CacheEntry<T>>> {
        self.get_at(query, source, Utc::now())
    }

    /// `get` evaluated against an explicit clock
    pub fn get_at<T: DeserializeOwned>(
        &self,
        query: &str,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry<T>>> {
        let conn = self.lock()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT results, created_at FROM search_cache
                 WHERE query = ?1 AND source = ?2 AND created_at > ?3",
                params![query, source, self.cutoff(now)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        drop(conn);

        let Some((payload, created_at)) = row else {
            debug!("Cache miss: {} ({})", query, source);
            return Ok(None);
        };

        let results: Vec<T> = serde_json::from_str(&payload)?;
        debug!("Cache hit: {} ({}) -> {} results", query, source, results.len());

        Ok(Some(CacheEntry {
            query: query.to_string(),
            source: source.to_string(),
            results,
            created_at: Utc
                .timestamp_opt(created_at, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }))
    }

    /// Store results, replacing whatever was cached under the same key
    pub fn set<T: Serialize>(&self, query: &str, source: &str, results: &[T]) -> Result<()> {
        self.set_at(query, source, results, Utc::now())
    }

    /// `set` with an explicit creation time
    pub fn set_at<T: Serialize>(
        &self,
        query: &str,
        source: &str,
        results: &[T],
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        let payload = serde_json::to_string(results)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO search_cache (query, source, results, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(query, source) DO UPDATE SET
                results = excluded.results,
                created_at = excluded.created_at",
            params![query, source, payload, created_at.timestamp()],
        )?;
        Ok(())
    }

    /// Delete rows past the TTL, returning how many went away
    pub fn purge_expired(&self) -> Result<usize> {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM search_cache WHERE created_at <= ?1",
            params![self.cutoff(now)],
        )?;
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
        Ok(removed)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock()?;
        let cutoff = self.cutoff(Utc::now());

        let mut stmt = conn.prepare(
            "SELECT source, COUNT(*), SUM(CASE WHEN created_at <= ?1 THEN 1 ELSE 0 END)
             FROM search_cache GROUP BY source",
        )?;
        let rows = stmt.query_map(params![cutoff], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut stats = CacheStats::default();
        for row in rows {
            let (source, count, expired) = row?;
            stats.total += count as usize;
            stats.expired += expired as usize;
            stats.by_source.insert(source, count as usize);
        }
        Ok(stats)
    }

    /// Wipe everything
    pub fn clear(&self) -> Result<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM search_cache", [])?)
    }
}
