//! Album Lookup API Client
//!
//! Audioscrobbler-style JSON API for album and artist metadata.
//!
//! ## Endpoints
//!
//! - **Album info**: `{base}?method=album.getinfo&api_key={key}&artist={artist}&album={album}&format=json`
//! - **Artist info**: `{base}?method=artist.getinfo&api_key={key}&artist={artist}&format=json`
//!
//! ## Rate Limiting
//!
//! The public tier is permissive but unspecified; we apply a conservative
//! one request per second.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ArtworkError, Result};
use crate::providers::RateLimiter;

/// Timeout for metadata lookups. Kept short so a slow provider cannot
/// stall the whole fetch chain.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for image downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Provider error code for "not found".
const ERROR_NOT_FOUND: i32 = 6;

/// What an album lookup resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumMeta {
    /// Release MBID usable against the cover archive.
    pub mbid: Option<String>,
    /// Direct URL of the largest listed image.
    pub image_url: Option<String>,
}

impl AlbumMeta {
    pub fn is_empty(&self) -> bool {
        self.mbid.is_none() && self.image_url.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiImage {
    #[serde(rename = "#text")]
    url: String,
    size: String,
}

#[derive(Debug, Deserialize)]
struct AlbumInfo {
    #[serde(default)]
    mbid: Option<String>,
    #[serde(default)]
    image: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    album: Option<AlbumInfo>,
}

#[derive(Debug, Deserialize)]
struct ArtistInfo {
    #[serde(default)]
    image: Vec<ApiImage>,
}

#[derive(Debug, Deserialize)]
struct ArtistResponse {
    artist: Option<ArtistInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: i32,
    message: String,
}

/// Album lookup API client with automatic rate limiting.
pub struct AlbumLookupClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
    user_agent: String,
    rate_limiter: Mutex<RateLimiter>,
}

impl AlbumLookupClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: String,
        api_key: String,
        user_agent: String,
        rate_limit_delay_ms: u64,
    ) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            user_agent,
            rate_limiter: Mutex::new(RateLimiter::new(rate_limit_delay_ms)),
        }
    }

    /// Resolve artist/album to an MBID and image URL.
    ///
    /// Returns `Ok(None)` when the provider does not know the album.
    pub async fn album_meta(&self, artist: &str, album: &str) -> Result<Option<AlbumMeta>> {
        let url = format!(
            "{}?method=album.getinfo&api_key={}&artist={}&album={}&format=json",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(artist),
            urlencoding::encode(album)
        );

        debug!("Querying album.getinfo for '{} - {}'", artist, album);
        let body = match self.execute_lookup(url).await? {
            Some(body) => body,
            None => return Ok(None),
        };

        let response: AlbumResponse = serde_json::from_slice(&body).map_err(|e| {
            ArtworkError::Provider(format!("Failed to parse album response: {e}"))
        })?;

        let meta = response.album.map(|album| AlbumMeta {
            mbid: album.mbid.filter(|m| !m.is_empty()),
            image_url: pick_largest_image(&album.image),
        });

        Ok(meta.filter(|m| !m.is_empty()))
    }

    /// Resolve an artist name to an image URL.
    pub async fn artist_image(&self, artist: &str) -> Result<Option<String>> {
        let url = format!(
            "{}?method=artist.getinfo&api_key={}&artist={}&format=json",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(artist)
        );

        debug!("Querying artist.getinfo for '{}'", artist);
        let body = match self.execute_lookup(url).await? {
            Some(body) => body,
            None => return Ok(None),
        };

        let response: ArtistResponse = serde_json::from_slice(&body).map_err(|e| {
            ArtworkError::Provider(format!("Failed to parse artist response: {e}"))
        })?;

        Ok(response
            .artist
            .and_then(|artist| pick_largest_image(&artist.image)))
    }

    /// Download an image by URL.
    ///
    /// Returns `Ok(None)` on a non-success status or an empty body, so a
    /// dead CDN link falls through the chain instead of aborting it.
    pub async fn download_image(&self, url: &str) -> Result<Option<Bytes>> {
        debug!("Downloading image from: {}", url);
        self.rate_limiter.lock().await.wait_if_needed().await;

        let request = HttpRequest::new(HttpMethod::Get, url.to_string())
            .header("User-Agent", self.user_agent.clone())
            .timeout(DOWNLOAD_TIMEOUT);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await
            .map_err(|e| ArtworkError::Provider(format!("Image download failed: {e}")))?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Image download rejected");
            return Ok(None);
        }

        if response.body.is_empty() {
            Ok(None)
        } else {
            info!(url = %url, size = response.body.len(), "Downloaded artwork image");
            Ok(Some(response.body))
        }
    }

    /// Shared lookup plumbing: rate limit, request, status and provider
    /// error mapping. `Ok(None)` means "not found".
    async fn execute_lookup(&self, url: String) -> Result<Option<Bytes>> {
        self.rate_limiter.lock().await.wait_if_needed().await;

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("User-Agent", self.user_agent.clone())
            .header("Accept", "application/json")
            .timeout(LOOKUP_TIMEOUT);

        // Transient 5xx answers from the lookup tier are retried by the
        // client; a 429 that survives the retries maps to RateLimited.
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await
            .map_err(|e| ArtworkError::Provider(format!("Lookup request failed: {e}")))?;

        if !response.is_success() {
            if response.status == 429 {
                let retry_after = response
                    .headers
                    .get("Retry-After")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ArtworkError::RateLimited {
                    provider: "album-lookup".to_string(),
                    retry_after_seconds: retry_after,
                });
            }
            if response.status == 404 {
                return Ok(None);
            }
            return Err(ArtworkError::Provider(format!(
                "Lookup failed with HTTP {}",
                response.status
            )));
        }

        if let Ok(error_resp) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            if error_resp.error == ERROR_NOT_FOUND {
                debug!("Provider reports not found");
                return Ok(None);
            }
            return Err(ArtworkError::Provider(format!(
                "API error {}: {}",
                error_resp.error, error_resp.message
            )));
        }

        Ok(Some(response.body))
    }
}

/// Prefer sizes in order: mega > extralarge > large > medium > first.
fn pick_largest_image(images: &[ApiImage]) -> Option<String> {
    images
        .iter()
        .find(|img| img.size == "mega")
        .or_else(|| images.iter().find(|img| img.size == "extralarge"))
        .or_else(|| images.iter().find(|img| img.size == "large"))
        .or_else(|| images.iter().find(|img| img.size == "medium"))
        .or_else(|| images.first())
        .map(|img| img.url.clone())
        .filter(|url| !url.is_empty())
}
