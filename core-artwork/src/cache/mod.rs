//! # Cache Tiers
//!
//! Two tiers sit in front of the network: a byte-accounted LRU of decoded
//! bitmaps in memory, and an encoded-bytes disk cache with a JSON index.
//! A disk hit re-seeds the memory tier on the way up.

mod disk;
mod memory;

pub use disk::DiskCache;
pub use memory::MemoryCache;

/// Counters reported by a cache tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: u64,
}
