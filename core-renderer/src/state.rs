//! # Renderer Playback States

use serde::{Deserialize, Serialize};

/// Externally visible playback state of the renderer.
///
/// The renderer owns the only legal transitions between these states;
/// consumers observe them through `RendererEvent::StateChanged` and must
/// not infer decoder-level details from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RendererState {
    /// No track loaded, or playback explicitly stopped.
    Stopped,
    /// A track is being attached to a decoder.
    Connecting,
    /// The decoder is preparing or seeking; audio is not advancing.
    Buffering,
    /// Audio is advancing.
    Playing,
    /// A track is loaded and prepared but not advancing.
    Paused,
    /// The current track ended and the pre-buffered next track is being
    /// promoted.
    SkippingToNext,
    /// A fatal decoder or source error occurred; both slots were reset.
    Error,
    /// Audio focus was lost while playing; playback will resume when
    /// focus returns.
    FocusLost,
}

impl RendererState {
    /// True when the renderer holds a usable prepared track.
    pub fn has_active_track(self) -> bool {
        matches!(
            self,
            RendererState::Playing
                | RendererState::Paused
                | RendererState::Buffering
                | RendererState::SkippingToNext
                | RendererState::FocusLost
        )
    }

    /// True when audio is actually advancing.
    pub fn is_playing(self) -> bool {
        matches!(self, RendererState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_track_states() {
        assert!(RendererState::Playing.has_active_track());
        assert!(RendererState::FocusLost.has_active_track());
        assert!(!RendererState::Stopped.has_active_track());
        assert!(!RendererState::Error.has_active_track());
    }
}
