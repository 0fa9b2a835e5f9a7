use thiserror::Error;

/// All the ways a TuneScout operation can fail
#[derive(Error, Debug)]
pub enum Error {
    #[error("YouTube request failed: {0}")]
    YouTube(#[from] tunescout_api::YouTubeError),

    #[error("Jamendo request failed: {0}")]
    Jamendo(#[from] tunescout_api::JamendoError),

    #[error("Search API request failed: {0}")]
    Backend(#[from] tunescout_api::BackendError),

    #[error("Cache operation failed: {0}")]
    CacheError(#[from] tunescout_cache::CacheError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown source: {0} (expected youtube or jamendo)")]
    UnknownSource(String),

    #[error("No provider registered for {0}")]
    NoProvider(crate::models::Source),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
