//! # Artwork Fetcher
//!
//! Source chain below the caches: local content first (unless the user
//! prefers downloads), then the provider chain. The disk cache fronts
//! everything here; the in-memory decoded cache lives above, in the
//! coordinator.
//!
//! ## Provider chain
//!
//! For an artist/album pair the lookup provider resolves a release MBID
//! plus a direct image URL. The cover archive is asked first when an MBID
//! exists; a miss there falls back to downloading the direct URL, so one
//! provider knowing the album but the other lacking its cover still
//! produces artwork.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

use bridge_traits::content::ContentResolver;
use bridge_traits::error::BridgeError;
use bridge_traits::http::HttpClient;
use bridge_traits::network::ConnectivityProbe;
use bridge_traits::settings::SettingsStore;

use crate::cache::{CacheStats, DiskCache};
use crate::config::{ArtworkConfig, FetchPolicy};
use crate::error::{ArtworkError, Result};
use crate::key::{ArtInfo, ArtworkSize};
use crate::providers::{AlbumLookupClient, CoverArchiveClient};

enum Source {
    Local,
    Network,
}

/// Resolves artwork identities to encoded image bytes.
pub struct ArtworkFetcher {
    content: Arc<dyn ContentResolver>,
    connectivity: Arc<dyn ConnectivityProbe>,
    settings: Arc<dyn SettingsStore>,
    lookup: AlbumLookupClient,
    archive: CoverArchiveClient,
    disk: DiskCache,
}

impl ArtworkFetcher {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        content: Arc<dyn ContentResolver>,
        connectivity: Arc<dyn ConnectivityProbe>,
        settings: Arc<dyn SettingsStore>,
        fs: Arc<dyn bridge_traits::fs::FileSystemAccess>,
        config: &ArtworkConfig,
    ) -> Self {
        let lookup = AlbumLookupClient::new(
            http_client.clone(),
            config.lookup_base_url.clone(),
            config.lookup_api_key.clone().unwrap_or_default(),
            config.user_agent.clone(),
            config.rate_limit_delay_ms,
        );
        let archive = CoverArchiveClient::new(
            http_client,
            config.cover_archive_base_url.clone(),
            config.user_agent.clone(),
            config.rate_limit_delay_ms,
        );
        let disk = DiskCache::new(fs, config.disk_limit_bytes);

        Self {
            content,
            connectivity,
            settings,
            lookup,
            archive,
            disk,
        }
    }

    /// Fetch encoded artwork bytes for `info`, consulting disk, local
    /// content, and the provider chain in policy order.
    pub async fn fetch(&self, info: &ArtInfo, size: ArtworkSize) -> Result<Bytes> {
        if info.is_empty() {
            return Err(ArtworkError::MissingIdentity);
        }

        let key = info.cache_key(size);
        if let Some(bytes) = self.disk.get(&key).await {
            return Ok(bytes);
        }

        let policy = FetchPolicy::from_settings(self.settings.as_ref()).await;
        if let Some(limit) = policy.disk_limit_bytes {
            self.disk.set_limit(limit);
        }
        let order = if policy.prefer_download {
            [Source::Network, Source::Local]
        } else {
            [Source::Local, Source::Network]
        };

        let mut denial: Option<String> = None;
        let mut last_err: Option<ArtworkError> = None;

        for source in order {
            match source {
                Source::Local => {
                    if let Some(bytes) = self.fetch_local(info).await {
                        self.disk.put(&key, bytes.clone()).await;
                        return Ok(bytes);
                    }
                }
                Source::Network => match self.fetch_network(info, &policy).await {
                    Ok(Some(bytes)) => {
                        self.disk.put(&key, bytes.clone()).await;
                        return Ok(bytes);
                    }
                    Ok(None) => {}
                    Err(ArtworkError::PolicyDenied(reason)) => {
                        debug!(reason = %reason, "Network artwork fetch denied by policy");
                        denial = Some(reason);
                    }
                    Err(e) => {
                        warn!(error = %e, "Network artwork fetch failed");
                        last_err = Some(e);
                    }
                },
            }
        }

        if let Some(e) = last_err {
            Err(e)
        } else if let Some(reason) = denial {
            Err(ArtworkError::PolicyDenied(reason))
        } else {
            Err(ArtworkError::AllSourcesExhausted)
        }
    }

    /// Read artwork from the track's local URI. Never touches the
    /// network; any failure is a miss.
    async fn fetch_local(&self, info: &ArtInfo) -> Option<Bytes> {
        let uri = info.uri.as_deref()?;
        match self.content.open_local(uri).await {
            Ok(bytes) if !bytes.is_empty() => {
                info!(uri = %uri, size = bytes.len(), "Loaded local artwork");
                Some(bytes)
            }
            Ok(_) => None,
            Err(BridgeError::NotFound(_)) => None,
            Err(e) => {
                warn!(uri = %uri, error = %e, "Local artwork unreadable");
                None
            }
        }
    }

    /// Run the provider chain, gated by connectivity and policy.
    async fn fetch_network(&self, info: &ArtInfo, policy: &FetchPolicy) -> Result<Option<Bytes>> {
        if !policy.download_missing {
            return Err(ArtworkError::PolicyDenied(
                "artwork downloads are disabled".to_string(),
            ));
        }
        if info.album.is_none() && !policy.download_artist_images {
            return Err(ArtworkError::PolicyDenied(
                "artist image downloads are disabled".to_string(),
            ));
        }
        if !self.connectivity.is_reachable().await {
            debug!("No network, skipping artwork download");
            return Ok(None);
        }
        if policy.wifi_only && !self.connectivity.is_wifi().await {
            return Err(ArtworkError::PolicyDenied(
                "downloads restricted to Wi-Fi".to_string(),
            ));
        }

        match (&info.artist, &info.album) {
            (Some(artist), Some(album)) => self.fetch_album_cover(artist, album).await,
            (Some(artist), None) => self.fetch_artist_image(artist).await,
            _ => Ok(None),
        }
    }

    async fn fetch_album_cover(&self, artist: &str, album: &str) -> Result<Option<Bytes>> {
        let meta = match self.lookup.album_meta(artist, album).await? {
            Some(meta) => meta,
            None => {
                debug!("Album unknown to lookup provider: '{} - {}'", artist, album);
                return Ok(None);
            }
        };

        if let Some(mbid) = &meta.mbid {
            match self.archive.front_cover(mbid).await {
                Ok(Some(bytes)) => return Ok(Some(bytes)),
                Ok(None) => {
                    debug!(mbid = %mbid, "Archive has no cover, trying direct image URL");
                }
                Err(e @ ArtworkError::RateLimited { .. }) => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Cover archive failed, trying direct image URL");
                }
            }
        }

        if let Some(url) = &meta.image_url {
            return self.lookup.download_image(url).await;
        }
        Ok(None)
    }

    async fn fetch_artist_image(&self, artist: &str) -> Result<Option<Bytes>> {
        match self.lookup.artist_image(artist).await? {
            Some(url) => self.lookup.download_image(&url).await,
            None => Ok(None),
        }
    }

    pub async fn disk_stats(&self) -> CacheStats {
        self.disk.stats().await
    }

    pub async fn clear_disk(&self) {
        self.disk.clear().await;
    }
}
