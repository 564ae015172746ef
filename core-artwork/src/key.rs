//! # Artwork Identity and Cache Keys
//!
//! Every cache tier and the in-flight coordinator key artwork by the same
//! derived string, so a request that is satisfiable by one tier is always
//! findable by the others.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Field separator inside the identity string before hashing. A control
/// character so artist and album names can never collide with the joined
/// form of a different pair.
const SEP: char = '\u{1f}';

/// Requested artwork size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtworkSize {
    /// Grid and list thumbnails (300x300).
    Thumbnail,
    /// Full-screen display (1024x1024).
    Large,
}

impl ArtworkSize {
    /// Pixel bound for this size class. Output never exceeds it on
    /// either axis.
    pub fn dimension(self) -> u32 {
        match self {
            ArtworkSize::Thumbnail => 300,
            ArtworkSize::Large => 1024,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ArtworkSize::Thumbnail => "thumb",
            ArtworkSize::Large => "large",
        }
    }
}

/// What is known about a track for artwork purposes.
///
/// Album artwork is keyed by artist plus album so all tracks of an album
/// share one cache entry. When tags are missing the track URI is the
/// fallback identity; with an artist but no album the identity names the
/// artist (artist image).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtInfo {
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Local content URI that may hold embedded or sidecar artwork.
    pub uri: Option<String>,
}

impl ArtInfo {
    pub fn album(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: Some(artist.into()),
            album: Some(album.into()),
            uri: None,
        }
    }

    pub fn artist(artist: impl Into<String>) -> Self {
        Self {
            artist: Some(artist.into()),
            album: None,
            uri: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// True when the info carries nothing to look artwork up by.
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.album.is_none() && self.uri.is_none()
    }

    /// Identity string before hashing. Case-insensitive for tag-derived
    /// identities; URIs are taken verbatim.
    fn identity(&self) -> String {
        if let (Some(artist), Some(album)) = (&self.artist, &self.album) {
            format!(
                "album{SEP}{}{SEP}{}",
                artist.to_lowercase(),
                album.to_lowercase()
            )
        } else if let Some(artist) = &self.artist {
            format!("artist{SEP}{}", artist.to_lowercase())
        } else if let Some(uri) = &self.uri {
            format!("uri{SEP}{uri}")
        } else {
            String::new()
        }
    }

    /// Stable cache key for this identity at the given size.
    pub fn cache_key(&self, size: ArtworkSize) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.identity().as_bytes());
        hasher.update([0x1f]);
        hasher.update(size.tag().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
