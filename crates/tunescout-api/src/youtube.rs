use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube's "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

#[derive(Error, Debug)]
pub enum YouTubeError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Quota exceeded or key rejected")]
    Forbidden,

    #[error("API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, YouTubeError>;

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_BASE.to_string())
    }

    /// Point the client at a different host (proxies, tests)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("TuneScout/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Search music videos
    ///
    /// Restricted to `type=video` in the music category, so every item
    /// should carry a video id. Anything that doesn't is dropped.
    pub async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<YouTubeVideo>> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(YouTubeError::MissingApiKey),
        };

        let url = format!("{}/search", self.base_url);
        debug!("YouTube search: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("q", query),
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
            ])
            .send()
            .await?;

        if response.status() == 403 {
            return Err(YouTubeError::Forbidden);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(YouTubeError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let page: YouTubeSearchResponse = serde_json::from_str(&body)?;

        let videos: Vec<YouTubeVideo> = page
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(YouTubeVideo {
                    video_id,
                    title: item.snippet.title,
                    channel_title: item.snippet.channel_title,
                    thumbnail_url: item.snippet.thumbnails.best_url(),
                })
            })
            .collect();

        debug!("YouTube returned {} videos", videos.len());
        Ok(videos)
    }
}

/// Flattened search hit - only the fields we actually show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YouTubeVideo {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YouTubeSearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Medium is what the result grid uses; fall back to whatever exists
    fn best_url(self) -> Option<String> {
        self.medium
            .or(self.high)
            .or(self.default)
            .map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}
