//! Catalog API client: album listings and search against the potsfyi server

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use super::song::SongAttributes;

/// Formats the terminal player asks the server to stream, in order of preference
pub const WANTED_FORMATS: [&str; 2] = ["ogg", "mp3"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

/// List responses are wrapped because the server refuses top-level arrays
#[derive(Debug, Deserialize)]
struct Envelope {
    objects: Vec<SongAttributes>,
}

/// Remote catalog seen by the playlist and the search box
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Tracks of one album, in track order
    async fn album(&self, album_id: u64) -> Result<Vec<SongAttributes>, CatalogError>;

    /// Mixed album and track matches for a free-text query
    async fn search(&self, query: &str) -> Result<Vec<SongAttributes>, CatalogError>;
}

/// Catalog API client over HTTP with JSON envelopes
#[derive(Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // the server answers unauthenticated requests with a redirect to its login page
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_objects(&self, path: &str) -> Result<Vec<SongAttributes>, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "API request started");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let envelope: Envelope = response.json().await.map_err(|e| CatalogError::Parse {
            url: url.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(url = %url, count = envelope.objects.len(), "API request successful");
        Ok(envelope.objects)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn album(&self, album_id: u64) -> Result<Vec<SongAttributes>, CatalogError> {
        self.get_objects(&album_path(album_id)).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SongAttributes>, CatalogError> {
        self.get_objects(&search_path(query)).await
    }
}

pub fn album_path(album_id: u64) -> String {
    format!("/album/{}", album_id)
}

pub fn search_path(query: &str) -> String {
    format!("/search?q={}", urlencoding::encode(query))
}

/// Where the browser player is opened for a track file
pub fn player_url(filename: &str) -> String {
    format!("/player?track_url={}", urlencoding::encode(filename))
}

/// Streaming route; the server redirects or transcodes depending on `formats`
pub fn song_stream_url(track_id: u64, formats: &[&str]) -> String {
    format!("/song/{}/{}", track_id, formats.join(","))
}
