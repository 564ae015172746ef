//! # Renderer Error Types

use thiserror::Error;

/// Errors that can occur while driving the playback renderer.
#[derive(Error, Debug)]
pub enum RendererError {
    /// No playable resource could be attached to a decoder.
    #[error("Failed to open audio source: {0}")]
    Source(String),

    /// A decoder reported a fatal error while playing.
    #[error("Decoder error: {0}")]
    Decoder(String),

    /// A signal arrived that the state machine cannot honor, such as a
    /// completion from a player that is not the current one.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// An operation was invoked in a state that does not permit it.
    #[error("Operation not permitted: {0}")]
    Precondition(String),

    /// A host bridge call failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),
}

impl RendererError {
    /// Returns `true` if the error indicates a problem with the audio
    /// source rather than with the renderer itself.
    pub fn is_source_error(&self) -> bool {
        matches!(self, RendererError::Source(_) | RendererError::Decoder(_))
    }
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RendererError>;
