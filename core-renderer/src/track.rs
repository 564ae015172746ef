//! # Track Resources
//!
//! What the renderer needs to know about a track in order to play it:
//! one or more resource locators, plus an optional duration hint for UIs
//! that want to render a timeline before the decoder has prepared. The
//! renderer always plays the first locator; alternates exist for the
//! track supplier's own bookkeeping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Where a track's audio bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// On-device file or content URI.
    Local,
    /// Remote stream reachable over HTTP.
    Remote,
}

/// One concrete location for a track's audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLocator {
    /// URI understood by the host decoder (`file://`, `content://`, `https://`).
    pub uri: String,
    /// MIME type when known.
    #[serde(default)]
    pub mime: Option<String>,
    /// Request headers for remote sources (auth tokens and the like).
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResourceLocator {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime: None,
            headers: HashMap::new(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// A playable track as the renderer sees it.
///
/// Resources are ordered by preference; the renderer attaches exactly
/// the first one, and a rejected first resource fails the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResource {
    pub resources: Vec<ResourceLocator>,
    #[serde(default)]
    pub duration_hint: Option<Duration>,
    pub provenance: Provenance,
}

impl TrackResource {
    /// A track with a single local resource.
    pub fn local(uri: impl Into<String>) -> Self {
        Self {
            resources: vec![ResourceLocator::new(uri)],
            duration_hint: None,
            provenance: Provenance::Local,
        }
    }

    /// A track with a single remote resource.
    pub fn remote(uri: impl Into<String>) -> Self {
        Self {
            resources: vec![ResourceLocator::new(uri)],
            duration_hint: None,
            provenance: Provenance::Remote,
        }
    }

    pub fn with_duration_hint(mut self, duration: Duration) -> Self {
        self.duration_hint = Some(duration);
        self
    }

    pub fn with_fallback(mut self, resource: ResourceLocator) -> Self {
        self.resources.push(resource);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_resources_keep_order() {
        let track = TrackResource::remote("https://a/1.flac")
            .with_fallback(ResourceLocator::new("https://b/1.mp3").with_mime("audio/mpeg"));

        assert_eq!(track.resources.len(), 2);
        assert_eq!(track.resources[0].uri, "https://a/1.flac");
        assert_eq!(track.resources[1].mime.as_deref(), Some("audio/mpeg"));
    }
}
