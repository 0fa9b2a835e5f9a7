// YouTube provider - bridges the API client with the SearchProvider trait
use async_trait::async_trait;
use tunescout_api::{YouTubeClient, YouTubeVideo};

use crate::{
    models::{SearchResult, Source},
    search::SearchProvider,
    Result,
};

pub struct YouTubeProvider {
    client: YouTubeClient,
    max_results: u32,
}

impl YouTubeProvider {
    pub fn new(client: YouTubeClient, max_results: u32) -> Self {
        Self {
            client,
            max_results,
        }
    }
}

#[async_trait]
impl SearchProvider for YouTubeProvider {
    fn source(&self) -> Source {
        Source::YouTube
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let videos = self.client.search_videos(query, self.max_results).await?;
        Ok(videos.into_iter().map(video_to_result).collect())
    }
}

/// Convert a YouTube search hit into our result model
fn video_to_result(video: YouTubeVideo) -> SearchResult {
    SearchResult {
        id: video.video_id,
        title: video.title,
        source: Source::YouTube,
        thumbnail: video.thumbnail_url,
        channel: Some(video.channel_title),
        artwork: None,
        artist: None,
        stream_url: None,
        license: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_mapping() {
        let result = video_to_result(YouTubeVideo {
            video_id: "v1".into(),
            title: "Tu Jhoom".into(),
            channel_title: "Coke Studio".into(),
            thumbnail_url: Some("https://i.ytimg.com/vi/v1/mqdefault.jpg".into()),
        });

        assert_eq!(result.source, Source::YouTube);
        assert_eq!(result.channel.as_deref(), Some("Coke Studio"));
        assert!(result.stream_url.is_none());
    }
}
