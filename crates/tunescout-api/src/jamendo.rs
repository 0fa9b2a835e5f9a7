use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const JAMENDO_API_BASE: &str = "https://api.jamendo.com/v3.0";

#[derive(Error, Debug)]
pub enum JamendoError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Jamendo answers 200 and reports failures in the `headers` block
    #[error("Jamendo rejected the request ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("Client id not configured")]
    MissingClientId,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JamendoError>;

pub struct JamendoClient {
    client: reqwest::Client,
    client_id: Option<String>,
    base_url: String,
}

impl JamendoClient {
    pub fn new(client_id: Option<String>) -> Self {
        Self::with_base_url(client_id, JAMENDO_API_BASE.to_string())
    }

    pub fn with_base_url(client_id: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("TuneScout/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            client_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_client_id(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Full-text track search
    pub async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<JamendoTrack>> {
        let client_id = match self.client_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return Err(JamendoError::MissingClientId),
        };

        let url = format!("{}/tracks", self.base_url);
        debug!("Jamendo search: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client_id", client_id),
                ("format", "json"),
                ("limit", &limit.to_string()),
                ("search", query),
                ("include", "licenses+musicinfo"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(JamendoError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let page: JamendoTracksResponse = serde_json::from_str(&body)?;

        if let Some(headers) = page.headers {
            if headers.status == "failed" {
                return Err(JamendoError::Rejected {
                    code: headers.code,
                    message: headers.error_message,
                });
            }
        }

        debug!("Jamendo returned {} tracks", page.results.len());
        Ok(page.results)
    }
}

#[derive(Debug, Deserialize)]
struct JamendoTracksResponse {
    headers: Option<ResponseHeaders>,
    #[serde(default)]
    results: Vec<JamendoTrack>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeaders {
    #[serde(default)]
    status: String,
    #[serde(default)]
    code: i64,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JamendoTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Direct MP3 stream
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, alias = "license_cc")]
    pub license_ccurl: Option<String>,
}
