use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
///
/// Loaded from the config file, then overridden by environment variables,
/// then by CLI flags. Priority: CLI > Env > File > Defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub jamendo: JamendoConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Config {
    /// Load config from the default location (or defaults), then apply env
    pub fn load() -> crate::Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Environment overrides. Variable names are the ones the deployment
    /// `.env` files already use.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("YOUTUBE_API_KEYS").filter(|v| !v.is_empty()) {
            self.youtube.api_key = Some(key);
        }
        if let Some(id) = lookup("JAMENDO_CLIENT_ID").filter(|v| !v.is_empty()) {
            self.jamendo.client_id = Some(id);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(path) = lookup("TUNESCOUT_DB").filter(|v| !v.is_empty()) {
            self.cache.db_path = Some(PathBuf::from(path));
        }
        if let Some(base) = lookup("TUNESCOUT_API_BASE").filter(|v| !v.is_empty()) {
            self.client.api_base = base;
        }
    }

    /// XDG config dir on Unix, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("tunescout");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Data API v3 key
    pub api_key: Option<String>,

    #[serde(default = "default_youtube_url")]
    pub api_url: String,

    #[serde(default = "default_page_size")]
    pub max_results: u32,
}

fn default_youtube_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_page_size() -> u32 {
    15
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_youtube_url(),
            max_results: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JamendoConfig {
    /// Get one at https://devportal.jamendo.com
    pub client_id: Option<String>,

    #[serde(default = "default_jamendo_url")]
    pub api_url: String,

    #[serde(default = "default_page_size")]
    pub limit: u32,
}

fn default_jamendo_url() -> String {
    "https://api.jamendo.com/v3.0".to_string()
}

impl Default for JamendoConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            api_url: default_jamendo_url(),
            limit: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache database file; defaults to the user cache dir
    pub db_path: Option<PathBuf>,

    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: i64,

    /// How often the server sweeps expired rows
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
}

fn default_cache_ttl() -> i64 {
    tunescout_cache::DEFAULT_TTL_SECS
}

fn default_purge_interval() -> u64 {
    60 // the TTL monitor of a managed store runs about once a minute
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            ttl_secs: default_cache_ttl(),
            purge_interval_secs: default_purge_interval(),
        }
    }
}

impl CacheConfig {
    pub fn resolved_db_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let dir = dirs::cache_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find cache directory".into()))?
            .join("tunescout");
        Ok(dir.join("search_cache.db"))
    }
}

/// Settings for the UI side talking to the search API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_youtube_timeout")]
    pub youtube_timeout_ms: u64,

    #[serde(default = "default_jamendo_timeout")]
    pub jamendo_timeout_ms: u64,
}

fn default_api_base() -> String {
    tunescout_api::DEFAULT_API_BASE.to_string()
}

fn default_youtube_timeout() -> u64 {
    8_000
}

fn default_jamendo_timeout() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            youtube_timeout_ms: default_youtube_timeout(),
            jamendo_timeout_ms: default_jamendo_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn timeouts(&self) -> crate::fallback::Timeouts {
        crate::fallback::Timeouts {
            youtube: Duration::from_millis(self.youtube_timeout_ms),
            jamendo: Duration::from_millis(self.jamendo_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.cache.ttl_secs, 604_800);
        assert_eq!(config.youtube.max_results, 15);
        assert_eq!(config.client.youtube_timeout_ms, 8_000);
        assert_eq!(config.client.jamendo_timeout_ms, 10_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("ttl_secs"));
        assert!(toml.contains("api_base"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.jamendo.limit, 15);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("YOUTUBE_API_KEYS", "yt-key"),
            ("JAMENDO_CLIENT_ID", "jm-id"),
            ("PORT", "7000"),
            ("TUNESCOUT_DB", "/tmp/ts.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::from_toml("[server]\nport = 8080\n").unwrap();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.youtube.api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.jamendo.client_id.as_deref(), Some("jm-id"));
        assert_eq!(config.cache.resolved_db_path().unwrap(), PathBuf::from("/tmp/ts.db"));
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 5000);
    }
}
