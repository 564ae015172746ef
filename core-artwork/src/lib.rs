//! # Artwork Pipeline
//!
//! Resolves track identities to display-ready album and artist artwork.
//!
//! ## Tiers
//!
//! 1. **Memory**: decoded RGBA bitmaps in a byte-bounded LRU.
//! 2. **Disk**: encoded bytes under the platform cache directory, evicted
//!    least-recently-accessed first.
//! 3. **Local**: artwork read from the track's own content URI.
//! 4. **Network**: an album lookup provider resolving MBIDs and image
//!    URLs, backed by the cover archive for the image itself.
//!
//! The [`ArtworkCoordinator`] fronts the pipeline: it coalesces
//! concurrent requests for the same cache key, bounds fetch concurrency,
//! and hands out cancellable handles. Below it the [`ArtworkFetcher`]
//! walks the local and network tiers under the user's
//! [`FetchPolicy`](config::FetchPolicy).
//!
//! ```ignore
//! let fetcher = ArtworkFetcher::new(http, content, connectivity, settings, fs, &config);
//! let coordinator = ArtworkCoordinator::new(fetcher, &config);
//!
//! let info = ArtInfo::album("Alvvays", "Antisocialites");
//! let handle = coordinator.request(&info, ArtworkSize::Thumbnail).await;
//! let artwork = handle.wait().await?;
//! ```

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod decode;
pub mod error;
pub mod fetcher;
pub mod key;
pub mod providers;

pub use cache::CacheStats;
pub use config::{ArtworkConfig, FetchPolicy};
pub use coordinator::{ArtworkCoordinator, ArtworkHandle, FetchResult};
pub use decode::Artwork;
pub use error::{ArtworkError, Result};
pub use fetcher::ArtworkFetcher;
pub use key::{ArtInfo, ArtworkSize};
