//! Media Player and Audio Focus Abstractions
//!
//! A [`MediaPlayer`] wraps exactly one platform decoder instance. The
//! renderer owns two of them at most (the current and the pre-buffered
//! next track) and drives each through the same narrow lifecycle:
//!
//! ```text
//! reset() -> set_data_source() -> prepare_async() -> start()/pause()/seek_to()
//!                                               \-> release()
//! ```
//!
//! Preparation and seeking are asynchronous on every platform decoder we
//! target; completion is signalled through [`PlayerEvent`]s delivered on an
//! unspecified thread. The renderer treats those signals as the only source
//! of truth for slot state and must never assume synchronous completion.
//!
//! Audio focus is the host OS's arbitration of which app may play loudly.
//! The renderer requests and abandons focus through
//! [`AudioFocusController`] and receives level changes from the host.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// Identifies one allocated decoder instance.
///
/// Ids are assigned by the renderer and are never reused within a renderer
/// lifetime, so a signal from an already-released player is detectable as
/// stale rather than being misattributed to a new slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Asynchronous decoder callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// `prepare_async` finished; the player may be started.
    Prepared,
    /// The current data source played to its end.
    Completed,
    /// A `seek_to` finished.
    SeekComplete,
    /// The decoder reported its audio session identifier (for equalizer or
    /// effects attachment; informational only).
    AudioSessionId(u32),
    /// The decoder failed. Fatal for the data source it was playing.
    Error { message: String },
}

/// A [`PlayerEvent`] tagged with the player that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSignal {
    pub player: PlayerId,
    pub event: PlayerEvent,
}

impl PlayerSignal {
    pub fn new(player: PlayerId, event: PlayerEvent) -> Self {
        Self { player, event }
    }
}

/// One platform decoder instance.
///
/// Control methods return quickly; anything that takes real time
/// (preparing, seeking) completes through a [`PlayerEvent`]. Calling
/// `start`/`pause`/`seek_to`/`set_volume` before a `Prepared` signal is a
/// caller error; the renderer's state machine never does this.
#[async_trait]
pub trait MediaPlayer: Send + Sync {
    /// Attach a data source. Must only be called on a freshly created or
    /// reset player.
    ///
    /// # Errors
    ///
    /// Fails when the source is invalid or inaccessible (an IO-class
    /// error); the player remains in the reset state.
    async fn set_data_source(&self, uri: &str, headers: &HashMap<String, String>) -> Result<()>;

    /// Begin asynchronous preparation. Completion is signalled by
    /// [`PlayerEvent::Prepared`]; never polled.
    async fn prepare_async(&self) -> Result<()>;

    /// Begin or resume playback.
    async fn start(&self) -> Result<()>;

    /// Pause playback, keeping the decoder and position.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position. Completion is signalled by
    /// [`PlayerEvent::SeekComplete`].
    async fn seek_to(&self, position: Duration) -> Result<()>;

    /// Set per-channel volume in `0.0..=1.0`.
    async fn set_volume(&self, left: f32, right: f32) -> Result<()>;

    /// Current playback position of the live decoder.
    async fn position(&self) -> Result<Duration>;

    /// Total duration, when the prepared source reports one.
    async fn duration(&self) -> Result<Option<Duration>>;

    /// Stop and detach the data source but keep the decoder allocated for
    /// reuse (soft reset).
    async fn reset(&self) -> Result<()>;

    /// Free the decoder. The player must not be used afterwards; a slot is
    /// always released explicitly, never dropped implicitly.
    async fn release(&self) -> Result<()>;
}

/// Creates decoder instances on demand.
///
/// The factory is handed the renderer-assigned [`PlayerId`]; the host
/// implementation is responsible for routing that player's callbacks back
/// into the renderer as [`PlayerSignal`]s.
pub trait PlayerFactory: Send + Sync {
    fn create(&self, id: PlayerId) -> std::sync::Arc<dyn MediaPlayer>;
}

/// Audio focus level granted by the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFocus {
    /// Another app holds focus and we may not play at all.
    NoFocusNoDuck,
    /// Another app holds focus but we may keep playing quietly.
    NoFocusCanDuck,
    /// We hold focus.
    Focused,
}

/// Requests and abandons audio focus with the host OS.
///
/// Implementations also cover the "audio becoming noisy" registration
/// (e.g. headphones unplugged) for the duration of a granted request;
/// subsequent focus changes re-enter the renderer through its focus
/// handler.
#[async_trait]
pub trait AudioFocusController: Send + Sync {
    /// Request focus. Returns the level actually granted.
    async fn request(&self) -> Result<AudioFocus>;

    /// Abandon a previously granted focus.
    async fn abandon(&self) -> Result<()>;
}
