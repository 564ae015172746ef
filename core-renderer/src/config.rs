//! # Renderer Configuration

use serde::{Deserialize, Serialize};

/// Renderer tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Volume applied while another app holds transient focus but allows
    /// quiet playback.
    ///
    /// Default: 0.2.
    #[serde(default = "default_duck_volume")]
    pub duck_volume: f32,

    /// Volume applied while we hold full audio focus.
    ///
    /// Default: 1.0.
    #[serde(default = "default_normal_volume")]
    pub normal_volume: f32,

    /// Buffer size of the event broadcast channel.
    ///
    /// Default: 64.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            duck_volume: default_duck_volume(),
            normal_volume: default_normal_volume(),
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_duck_volume() -> f32 {
    0.2
}

fn default_normal_volume() -> f32 {
    1.0
}

fn default_event_capacity() -> usize {
    64
}
