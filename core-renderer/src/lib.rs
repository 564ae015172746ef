//! # Core Renderer
//!
//! Gapless local playback built on host-provided decoders.
//!
//! ## Overview
//!
//! The [`Renderer`] drives at most two [`MediaPlayer`](bridge_traits::MediaPlayer)
//! instances: the current track and an optionally pre-buffered next track.
//! Track completion promotes the next slot with an index swap, so the
//! transition is gapless from the listener's point of view.
//!
//! Decoder callbacks and audio-focus changes re-enter the state machine
//! through [`Renderer::handle_signal`] and [`Renderer::handle_focus_change`];
//! consumers observe the results as [`RendererEvent`]s.
//!
//! ## Usage
//!
//! ```ignore
//! use core_renderer::{Renderer, RendererConfig, TrackResource};
//!
//! let mut renderer = Renderer::new(factory, focus, RendererConfig::default());
//! let mut events = renderer.subscribe();
//!
//! renderer.prepare_for_track(TrackResource::local("/music/a.flac")).await?;
//! renderer.play().await?;
//! renderer.load_next_track(TrackResource::local("/music/b.flac")).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod renderer;
mod slot;
pub mod state;
pub mod track;

pub use config::RendererConfig;
pub use error::{RendererError, Result};
pub use events::RendererEvent;
pub use renderer::Renderer;
pub use state::RendererState;
pub use track::{Provenance, ResourceLocator, TrackResource};
