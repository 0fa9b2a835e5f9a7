// Jamendo provider - bridges the API client with the SearchProvider trait
use async_trait::async_trait;
use tunescout_api::{JamendoClient, JamendoTrack};

use crate::{
    models::{SearchResult, Source},
    search::SearchProvider,
    Result,
};

pub struct JamendoProvider {
    client: JamendoClient,
    limit: u32,
}

impl JamendoProvider {
    pub fn new(client: JamendoClient, limit: u32) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl SearchProvider for JamendoProvider {
    fn source(&self) -> Source {
        Source::Jamendo
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let tracks = self.client.search_tracks(query, self.limit).await?;
        Ok(tracks.into_iter().map(track_to_result).collect())
    }
}

/// Convert a Jamendo track into our result model
fn track_to_result(track: JamendoTrack) -> SearchResult {
    SearchResult {
        id: track.id,
        title: track.name,
        source: Source::Jamendo,
        thumbnail: None,
        channel: None,
        artwork: track.image,
        artist: Some(track.artist_name),
        stream_url: track.audio,
        license: track.license_ccurl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_mapping_keeps_stream_and_license() {
        let result = track_to_result(JamendoTrack {
            id: "77".into(),
            name: "Night Drive".into(),
            artist_name: "Synth Person".into(),
            image: Some("https://img/77.jpg".into()),
            audio: Some("https://stream/77".into()),
            license_ccurl: Some("http://creativecommons.org/licenses/by/3.0/".into()),
        });

        assert_eq!(result.source, Source::Jamendo);
        assert_eq!(result.artwork.as_deref(), Some("https://img/77.jpg"));
        assert_eq!(result.stream_url.as_deref(), Some("https://stream/77"));
        assert!(result.license.is_some());
        assert!(result.thumbnail.is_none());
    }
}
