//! # Remote Artwork Providers
//!
//! Two cooperating providers back the network tier:
//! - [`AlbumLookupClient`]: an audioscrobbler-style metadata API that
//!   resolves artist/album to a release MBID plus a direct image URL,
//!   and serves artist images.
//! - [`CoverArchiveClient`]: the cover archive keyed by release MBID,
//!   preferred for image quality when an MBID is known.
//!
//! Both enforce a shared-style rate limit of one request per configured
//! interval and map provider "not found" responses to `Ok(None)` so the
//! fetcher can fall through the chain.

mod album_lookup;
mod cover_archive;
mod rate_limit;

pub use album_lookup::{AlbumLookupClient, AlbumMeta};
pub use cover_archive::CoverArchiveClient;
pub(crate) use rate_limit::RateLimiter;
