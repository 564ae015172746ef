//! # Artwork Pipeline Configuration

use bridge_traits::settings::SettingsStore;
use serde::{Deserialize, Serialize};

/// Settings keys the fetch policy is derived from.
pub mod keys {
    /// Only download over Wi-Fi (bool, default false).
    pub const WIFI_ONLY: &str = "artwork.wifi_only";
    /// Allow network fetches at all (bool, default true).
    pub const DOWNLOAD_MISSING: &str = "artwork.download_missing";
    /// Consult the network before local sources (bool, default false).
    pub const PREFER_DOWNLOAD: &str = "artwork.prefer_download";
    /// Allow artist-image lookups for album-less requests (bool, default false).
    pub const DOWNLOAD_ARTIST_IMAGES: &str = "artwork.download_artist_images";
    /// Disk cache budget in megabytes (u64, default 256).
    pub const DISK_LIMIT_MB: &str = "artwork.disk_limit_mb";
}

/// User-controlled fetch policy, read from the settings store on every
/// request so preference changes apply without a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub wifi_only: bool,
    pub download_missing: bool,
    pub prefer_download: bool,
    pub download_artist_images: bool,
    /// Disk budget override in bytes; `None` keeps the configured default.
    pub disk_limit_bytes: Option<u64>,
}

impl FetchPolicy {
    pub async fn from_settings(settings: &dyn SettingsStore) -> Self {
        Self {
            wifi_only: settings.bool_or(keys::WIFI_ONLY, false).await,
            download_missing: settings.bool_or(keys::DOWNLOAD_MISSING, true).await,
            prefer_download: settings.bool_or(keys::PREFER_DOWNLOAD, false).await,
            download_artist_images: settings
                .bool_or(keys::DOWNLOAD_ARTIST_IMAGES, false)
                .await,
            disk_limit_bytes: settings
                .get_u64(keys::DISK_LIMIT_MB)
                .await
                .ok()
                .flatten()
                .map(|mb| mb * 1024 * 1024),
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            wifi_only: false,
            download_missing: true,
            prefer_download: false,
            download_artist_images: false,
            disk_limit_bytes: None,
        }
    }
}

/// Static artwork pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtworkConfig {
    /// Fraction of the process memory budget given to the decoded-image
    /// cache.
    ///
    /// Default: 0.15.
    #[serde(default = "default_memory_fraction")]
    pub memory_fraction: f64,

    /// Total memory budget in bytes the fraction applies to.
    ///
    /// Default: 256 MB.
    #[serde(default = "default_memory_budget_bytes")]
    pub memory_budget_bytes: usize,

    /// Disk cache budget in bytes, unless overridden via settings.
    ///
    /// Default: 256 MB.
    #[serde(default = "default_disk_limit_bytes")]
    pub disk_limit_bytes: u64,

    /// Maximum concurrent network/disk fetches.
    ///
    /// Default: 4.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Minimum delay between provider requests in milliseconds.
    ///
    /// Default: 1000 (1 request per second).
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Album lookup API key, when the deployment has one.
    #[serde(default)]
    pub lookup_api_key: Option<String>,

    /// Album lookup API base URL.
    #[serde(default = "default_lookup_base_url")]
    pub lookup_base_url: String,

    /// Cover archive base URL.
    #[serde(default = "default_cover_archive_base_url")]
    pub cover_archive_base_url: String,

    /// User-Agent sent to providers.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ArtworkConfig {
    /// Effective in-memory cache budget in bytes.
    pub fn memory_cache_bytes(&self) -> usize {
        (self.memory_budget_bytes as f64 * self.memory_fraction) as usize
    }
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            memory_fraction: default_memory_fraction(),
            memory_budget_bytes: default_memory_budget_bytes(),
            disk_limit_bytes: default_disk_limit_bytes(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            lookup_api_key: None,
            lookup_base_url: default_lookup_base_url(),
            cover_archive_base_url: default_cover_archive_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_memory_fraction() -> f64 {
    0.15
}

fn default_memory_budget_bytes() -> usize {
    256 * 1024 * 1024
}

fn default_disk_limit_bytes() -> u64 {
    256 * 1024 * 1024
}

fn default_max_concurrent_fetches() -> usize {
    4
}

fn default_rate_limit_delay_ms() -> u64 {
    1000
}

fn default_lookup_base_url() -> String {
    "https://ws.audioscrobbler.com/2.0/".to_string()
}

fn default_cover_archive_base_url() -> String {
    "https://coverartarchive.org".to_string()
}

fn default_user_agent() -> String {
    "local-renderer-core/0.1.0".to_string()
}
