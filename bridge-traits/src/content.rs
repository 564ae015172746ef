//! Content URI Resolution
//!
//! Local artwork may live behind opaque content URIs (media-store style
//! `content://` entries, `file://` URLs, plain paths). The resolver turns
//! such a URI into bytes or fails; it never touches the network.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Resolves a local content URI to its raw bytes.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Open a local URI and read it fully.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NotFound` when the URI does not resolve, or an
    /// IO error when the read fails. Local reads carry no timeout; they are
    /// bounded by OS I/O.
    async fn open_local(&self, uri: &str) -> Result<Bytes>;
}
