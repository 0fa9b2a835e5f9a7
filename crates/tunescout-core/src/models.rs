use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which catalog a result came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    YouTube,
    Jamendo,
}

impl Source {
    /// Path segment and cache tag: `youtube` / `jamendo`
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::YouTube => "youtube",
            Source::Jamendo => "jamendo",
        }
    }

    /// Query used when the caller sends an empty `q`
    pub fn default_query(&self) -> &'static str {
        match self {
            Source::YouTube => "Coke Studio Pakistan",
            Source::Jamendo => "lofi",
        }
    }

    /// Two-letter badge for mixed result lists
    pub fn badge(&self) -> &'static str {
        match self {
            Source::YouTube => "YT",
            Source::Jamendo => "JM",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::YouTube => write!(f, "YouTube"),
            Source::Jamendo => write!(f, "Jamendo"),
        }
    }
}

impl FromStr for Source {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" | "yt" => Ok(Source::YouTube),
            "jamendo" | "jm" => Ok(Source::Jamendo),
            other => Err(crate::Error::UnknownSource(other.to_string())),
        }
    }
}

/// One playable hit from either catalog
///
/// Videos carry `thumbnail`/`channel`, audio tracks carry
/// `artwork`/`artist`/`streamUrl`. Field names match the JSON the HTTP API
/// has always returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, rename = "streamUrl", skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl SearchResult {
    /// Channel for videos, artist for tracks
    pub fn creator(&self) -> &str {
        self.channel
            .as_deref()
            .or(self.artist.as_deref())
            .unwrap_or("")
    }

    /// Thumbnail for videos, artwork for tracks
    pub fn image(&self) -> Option<&str> {
        self.thumbnail.as_deref().or(self.artwork.as_deref())
    }

    /// Where playback happens: the watch page for videos (embedded player),
    /// the raw stream for audio
    pub fn playback_url(&self) -> Option<String> {
        match self.source {
            Source::YouTube => Some(format!("https://www.youtube.com/watch?v={}", self.id)),
            Source::Jamendo => self.stream_url.clone(),
        }
    }
}

/// Outcome of one cache-aware search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jamendo_result_uses_camel_case_stream_url() {
        let result = SearchResult {
            id: "42".into(),
            title: "Rain".into(),
            source: Source::Jamendo,
            thumbnail: None,
            channel: None,
            artwork: Some("https://img/a.jpg".into()),
            artist: Some("Someone".into()),
            stream_url: Some("https://stream/42.mp3".into()),
            license: None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "jamendo");
        assert_eq!(json["streamUrl"], "https://stream/42.mp3");
        assert!(json.get("thumbnail").is_none());
        assert_eq!(result.creator(), "Someone");
        assert_eq!(result.playback_url().as_deref(), Some("https://stream/42.mp3"));
    }

    #[test]
    fn test_youtube_result_plays_on_watch_page() {
        let result: SearchResult = serde_json::from_value(serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Song",
            "channel": "Channel",
            "thumbnail": "https://i.ytimg.com/x.jpg",
            "source": "youtube"
        }))
        .unwrap();

        assert_eq!(result.source, Source::YouTube);
        assert_eq!(result.image(), Some("https://i.ytimg.com/x.jpg"));
        assert_eq!(
            result.playback_url().as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("YouTube".parse::<Source>().unwrap(), Source::YouTube);
        assert_eq!("jm".parse::<Source>().unwrap(), Source::Jamendo);
        assert!("spotify".parse::<Source>().is_err());
    }
}
