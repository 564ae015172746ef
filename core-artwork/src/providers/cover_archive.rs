//! Cover Archive Client
//!
//! Fetches front covers by release MBID:
//! `{base}/release-group/{mbid}/front`
//!
//! The archive answers 404 for releases without artwork and 503 while a
//! release is being indexed; both are treated as a miss so the fetcher
//! falls back to the lookup provider's direct image URL.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ArtworkError, Result};
use crate::providers::RateLimiter;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Cover archive client with automatic rate limiting.
pub struct CoverArchiveClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    user_agent: String,
    rate_limiter: Mutex<RateLimiter>,
}

impl CoverArchiveClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: String,
        user_agent: String,
        rate_limit_delay_ms: u64,
    ) -> Self {
        Self {
            http_client,
            base_url,
            user_agent,
            rate_limiter: Mutex::new(RateLimiter::new(rate_limit_delay_ms)),
        }
    }

    /// Fetch the front cover for a release MBID.
    ///
    /// Returns `Ok(None)` when the archive has no usable cover.
    pub async fn front_cover(&self, mbid: &str) -> Result<Option<Bytes>> {
        let url = format!(
            "{}/release-group/{}/front",
            self.base_url,
            urlencoding::encode(mbid)
        );

        debug!(mbid = %mbid, "Fetching front cover");
        self.rate_limiter.lock().await.wait_if_needed().await;

        let request = HttpRequest::new(HttpMethod::Get, url)
            .header("User-Agent", self.user_agent.clone())
            .timeout(REQUEST_TIMEOUT);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::no_retry())
            .await
            .map_err(|e| ArtworkError::Provider(format!("Cover archive request failed: {e}")))?;

        match response.status {
            _ if response.is_success() => {
                if response.body.is_empty() {
                    Ok(None)
                } else {
                    info!(mbid = %mbid, size = response.body.len(), "Fetched front cover");
                    Ok(Some(response.body))
                }
            }
            404 | 503 => {
                debug!(mbid = %mbid, status = response.status, "No front cover available");
                Ok(None)
            }
            429 => {
                let retry_after = response
                    .headers
                    .get("Retry-After")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ArtworkError::RateLimited {
                    provider: "cover-archive".to_string(),
                    retry_after_seconds: retry_after,
                })
            }
            status => {
                warn!(mbid = %mbid, status, "Cover archive error");
                Err(ArtworkError::Provider(format!(
                    "Cover archive failed with HTTP {status}"
                )))
            }
        }
    }
}
