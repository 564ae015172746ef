//! # Playback Renderer
//!
//! Gapless two-slot playback state machine. One slot holds the current
//! track, the other an optional pre-buffered next track; advancing is an
//! index swap followed by releasing the outgoing decoder.
//!
//! All decoder callbacks re-enter through [`Renderer::handle_signal`] and
//! all audio-focus changes through [`Renderer::handle_focus_change`];
//! `reconcile_focus` is the only place that maps the granted focus level
//! onto decoder volume and start/pause calls.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::player::{
    AudioFocus, AudioFocusController, MediaPlayer, PlayerEvent, PlayerFactory, PlayerId,
    PlayerSignal,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::RendererConfig;
use crate::error::{RendererError, Result};
use crate::events::{EventBus, RendererEvent};
use crate::slot::PlayerSlot;
use crate::state::RendererState;
use crate::track::TrackResource;

/// Which slot a signal was attributed to.
enum SlotRole {
    Current,
    Next,
    Unknown,
}

/// Gapless local playback renderer.
pub struct Renderer {
    factory: Arc<dyn PlayerFactory>,
    focus: Arc<dyn AudioFocusController>,
    config: RendererConfig,
    events: EventBus,

    slots: [PlayerSlot; 2],
    current: usize,
    state: RendererState,

    /// Last known position, kept current whenever the live decoder is
    /// paused or torn down.
    checkpoint: Duration,
    /// Seek requested before the current slot finished preparing.
    pending_seek: Option<Duration>,
    /// Playback intent. Set by `play`, cleared by `pause`, `stop`,
    /// completion without a queued next track, and fatal errors. While
    /// set, regaining focus or finishing preparation starts the decoder.
    play_on_focus_gain: bool,
    focus_level: AudioFocus,

    next_player_id: u64,
}

impl Renderer {
    pub fn new(
        factory: Arc<dyn PlayerFactory>,
        focus: Arc<dyn AudioFocusController>,
        config: RendererConfig,
    ) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            factory,
            focus,
            config,
            events,
            slots: [PlayerSlot::empty(), PlayerSlot::empty()],
            current: 0,
            state: RendererState::Stopped,
            checkpoint: Duration::ZERO,
            pending_seek: None,
            play_on_focus_gain: false,
            focus_level: AudioFocus::NoFocusNoDuck,
            next_player_id: 0,
        }
    }

    /// Subscribe to renderer notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<RendererEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Audio session id of the current decoder, when reported.
    pub fn audio_session_id(&self) -> Option<u32> {
        self.slots[self.current].session_id
    }

    // ------------------------------------------------------------------
    // Track loading
    // ------------------------------------------------------------------

    /// Load `track` into the current slot and begin preparing it.
    ///
    /// Any previous current track is discarded. Playback does not start
    /// until [`play`](Self::play) expresses intent and preparation
    /// finishes.
    pub async fn prepare_for_track(&mut self, track: TrackResource) -> Result<()> {
        self.checkpoint = Duration::ZERO;
        self.pending_seek = None;
        self.set_state(RendererState::Connecting);

        if let Err(e) = self.attach_track(self.current, track).await {
            self.events.emit(RendererEvent::Error {
                message: e.to_string(),
            });
            return Err(e);
        }

        self.set_state(RendererState::Buffering);
        Ok(())
    }

    /// Pre-buffer `track` as the next one for a gapless transition.
    ///
    /// Requires a current track; queueing a next track into an idle
    /// renderer is rejected.
    pub async fn load_next_track(&mut self, track: TrackResource) -> Result<()> {
        if !self.slots[self.current].has_track() {
            let err = RendererError::Precondition(
                "Cannot queue a next track without a current track".to_string(),
            );
            self.events.emit(RendererEvent::Error {
                message: err.to_string(),
            });
            return Err(err);
        }

        let next = self.next_index();
        self.attach_track(next, track).await
    }

    async fn attach_track(&mut self, index: usize, track: TrackResource) -> Result<()> {
        self.slots[index].soft_reset().await?;
        let player = self.ensure_player(index);

        // Alternates on the track belong to the supplier's bookkeeping;
        // the renderer plays the first resource or fails the load.
        let resource = track
            .resources
            .first()
            .ok_or_else(|| RendererError::Source("Track carries no resource".to_string()))?;

        player
            .set_data_source(&resource.uri, &resource.headers)
            .await
            .map_err(|e| {
                RendererError::Source(format!("Data source '{}' rejected: {e}", resource.uri))
            })?;
        debug!(uri = %resource.uri, slot = index, "Attached data source");

        player.prepare_async().await?;
        self.slots[index].track = Some(track);
        Ok(())
    }

    fn ensure_player(&mut self, index: usize) -> Arc<dyn MediaPlayer> {
        if let Some(player) = &self.slots[index].player {
            return Arc::clone(player);
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        let player = self.factory.create(id);
        info!(player = %id, slot = index, "Allocated decoder");
        self.slots[index].id = Some(id);
        self.slots[index].player = Some(Arc::clone(&player));
        player
    }

    // ------------------------------------------------------------------
    // Transport controls
    // ------------------------------------------------------------------

    /// Express playback intent: request audio focus and start the current
    /// decoder as soon as both focus and preparation allow it.
    pub async fn play(&mut self) -> Result<()> {
        if !self.slots[self.current].has_track() {
            return Err(RendererError::Precondition(
                "No track loaded".to_string(),
            ));
        }

        self.play_on_focus_gain = true;
        self.focus_level = self.focus.request().await?;
        self.reconcile_focus().await
    }

    /// Pause playback and abandon audio focus.
    pub async fn pause(&mut self) -> Result<()> {
        self.play_on_focus_gain = false;

        if self.state.is_playing() {
            if let Some(player) = self.current_player_if_prepared() {
                self.checkpoint = player.position().await?;
                player.pause().await?;
            }
        }

        if let Err(e) = self.focus.abandon().await {
            warn!(error = %e, "Failed to abandon audio focus");
        }
        self.focus_level = AudioFocus::NoFocusNoDuck;
        self.set_state(RendererState::Paused);
        Ok(())
    }

    /// Seek within the current track.
    ///
    /// Before preparation finishes the seek is remembered and applied on
    /// the `Prepared` signal; afterwards it is forwarded to the decoder
    /// and playback resumes on `SeekComplete`.
    pub async fn seek_to(&mut self, position: Duration) -> Result<()> {
        if !self.slots[self.current].has_track() {
            return Err(RendererError::Precondition(
                "No track loaded".to_string(),
            ));
        }

        self.checkpoint = position;

        match self.current_player_if_prepared() {
            None => {
                self.pending_seek = Some(position);
                Ok(())
            }
            Some(player) => {
                player.seek_to(position).await?;
                self.set_state(RendererState::Buffering);
                Ok(())
            }
        }
    }

    /// Promote the pre-buffered next track to current.
    ///
    /// The outgoing decoder is released strictly after the index swap so
    /// a late signal from it can never be attributed to the new current
    /// slot.
    pub async fn go_to_next(&mut self) -> Result<()> {
        let next = self.next_index();
        if !self.slots[next].has_track() {
            let err = RendererError::Precondition("No next track queued".to_string());
            self.events.emit(RendererEvent::Error {
                message: err.to_string(),
            });
            return Err(err);
        }

        let outgoing = self.current;
        self.current = next;
        self.checkpoint = Duration::ZERO;
        self.pending_seek = None;
        self.set_state(RendererState::SkippingToNext);
        self.events.emit(RendererEvent::WentToNext);

        if self.slots[self.current].prepared {
            self.reconcile_focus().await?;
            if !self.state.is_playing() {
                self.set_state(RendererState::Paused);
            }
        }

        if let Err(e) = self.slots[outgoing].release().await {
            warn!(error = %e, "Failed to release outgoing decoder");
        }
        Ok(())
    }

    /// Stop playback and release both decoders.
    pub async fn stop(&mut self, notify: bool) -> Result<()> {
        self.play_on_focus_gain = false;
        self.pending_seek = None;
        self.checkpoint = Duration::ZERO;

        for slot in &mut self.slots {
            if let Err(e) = slot.release().await {
                warn!(error = %e, "Failed to release decoder during stop");
            }
        }

        if let Err(e) = self.focus.abandon().await {
            warn!(error = %e, "Failed to abandon audio focus");
        }
        self.focus_level = AudioFocus::NoFocusNoDuck;

        if notify {
            self.set_state(RendererState::Stopped);
        } else {
            self.state = RendererState::Stopped;
        }
        Ok(())
    }

    /// Current playback position.
    ///
    /// Queried live from the decoder only while playing; otherwise the
    /// last checkpoint is returned, so a released or mid-transition
    /// decoder never produces a bogus position.
    pub async fn position(&self) -> Duration {
        if self.state.is_playing() {
            if let Some(player) = self.current_player_if_prepared() {
                if let Ok(position) = player.position().await {
                    return position;
                }
            }
        }
        self.checkpoint
    }

    /// Duration of the current track, when known.
    pub async fn duration(&self) -> Option<Duration> {
        if let Some(player) = self.current_player_if_prepared() {
            if let Ok(duration) = player.duration().await {
                return duration;
            }
        }
        self.slots[self.current]
            .track
            .as_ref()
            .and_then(|t| t.duration_hint)
    }

    // ------------------------------------------------------------------
    // Signal handling
    // ------------------------------------------------------------------

    /// Handle an asynchronous decoder callback.
    ///
    /// Signals from released players are logged and dropped; signals that
    /// are impossible for their slot surface as a protocol violation
    /// without touching current playback.
    pub async fn handle_signal(&mut self, signal: PlayerSignal) -> Result<()> {
        let role = self.classify(signal.player);

        match (role, signal.event) {
            (SlotRole::Unknown, event) => {
                warn!(player = %signal.player, event = ?event, "Signal from released player, dropping");
                Ok(())
            }

            (SlotRole::Current, PlayerEvent::Prepared) => self.on_current_prepared().await,
            (SlotRole::Next, PlayerEvent::Prepared) => {
                self.slots[self.next_index()].prepared = true;
                debug!(player = %signal.player, "Next track prepared");
                Ok(())
            }

            (SlotRole::Current, PlayerEvent::Completed) => self.on_current_completed().await,
            (SlotRole::Next, PlayerEvent::Completed) => {
                self.protocol_violation(signal.player, "completion from non-current player")
                    .await
            }

            (SlotRole::Current, PlayerEvent::SeekComplete) => self.on_seek_complete().await,
            (SlotRole::Next, PlayerEvent::SeekComplete) => {
                warn!(player = %signal.player, "Seek completion from next slot, ignoring");
                self.events.emit(RendererEvent::Error {
                    message: RendererError::ProtocolViolation(
                        "seek completion from non-current player".to_string(),
                    )
                    .to_string(),
                });
                Ok(())
            }

            (role, PlayerEvent::AudioSessionId(id)) => {
                let index = match role {
                    SlotRole::Current => self.current,
                    SlotRole::Next => self.next_index(),
                    SlotRole::Unknown => unreachable!("handled above"),
                };
                self.slots[index].session_id = Some(id);
                if index == self.current {
                    self.events.emit(RendererEvent::AudioSession(id));
                }
                Ok(())
            }

            (_, PlayerEvent::Error { message }) => self.on_player_error(message).await,
        }
    }

    /// Handle an audio focus change pushed by the host.
    pub async fn handle_focus_change(&mut self, focus: AudioFocus) -> Result<()> {
        debug!(focus = ?focus, "Audio focus changed");
        self.focus_level = focus;
        self.reconcile_focus().await
    }

    async fn on_current_prepared(&mut self) -> Result<()> {
        self.slots[self.current].prepared = true;

        if let Some(position) = self.pending_seek.take() {
            if let Some(player) = self.current_player_if_prepared() {
                player.seek_to(position).await?;
                self.set_state(RendererState::Buffering);
                return Ok(());
            }
        }

        if self.play_on_focus_gain {
            self.reconcile_focus().await?;
            // Intent without focus parks in Paused; the intent itself
            // survives until the next focus gain.
            if !self.state.is_playing() {
                self.set_state(RendererState::Paused);
            }
        } else {
            self.set_state(RendererState::Paused);
        }
        Ok(())
    }

    async fn on_current_completed(&mut self) -> Result<()> {
        if self.slots[self.next_index()].has_track() {
            return self.go_to_next().await;
        }

        self.play_on_focus_gain = false;
        self.checkpoint = Duration::ZERO;
        if let Err(e) = self.slots[self.current].release().await {
            warn!(error = %e, "Failed to release decoder after completion");
        }
        if let Err(e) = self.focus.abandon().await {
            warn!(error = %e, "Failed to abandon audio focus");
        }
        self.focus_level = AudioFocus::NoFocusNoDuck;
        self.events.emit(RendererEvent::Completed);
        self.set_state(RendererState::Stopped);
        Ok(())
    }

    async fn on_seek_complete(&mut self) -> Result<()> {
        if self.play_on_focus_gain && self.focus_level != AudioFocus::NoFocusNoDuck {
            if let Some(player) = self.current_player_if_prepared() {
                player.start().await?;
                self.set_state(RendererState::Playing);
                return Ok(());
            }
        }
        self.set_state(RendererState::Paused);
        Ok(())
    }

    async fn on_player_error(&mut self, message: String) -> Result<()> {
        warn!(error = %message, "Decoder reported fatal error");

        self.play_on_focus_gain = false;
        self.pending_seek = None;
        self.checkpoint = Duration::ZERO;
        for slot in &mut self.slots {
            if let Err(e) = slot.release().await {
                warn!(error = %e, "Failed to release decoder after error");
            }
        }
        if let Err(e) = self.focus.abandon().await {
            warn!(error = %e, "Failed to abandon audio focus");
        }
        self.focus_level = AudioFocus::NoFocusNoDuck;

        self.set_state(RendererState::Error);
        self.events.emit(RendererEvent::Error {
            message: RendererError::Decoder(message).to_string(),
        });
        Ok(())
    }

    async fn protocol_violation(&mut self, player: PlayerId, what: &str) -> Result<()> {
        warn!(player = %player, "Protocol violation: {what}");
        self.events.emit(RendererEvent::Error {
            message: RendererError::ProtocolViolation(what.to_string()).to_string(),
        });

        // The stale slot's decoder is in an undefined state; drop it.
        let next = self.next_index();
        if self.slots[next].matches(player) {
            if let Err(e) = self.slots[next].release().await {
                warn!(error = %e, "Failed to release stale decoder");
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Focus reconciliation
    // ------------------------------------------------------------------

    /// Map the granted focus level onto the current decoder.
    ///
    /// This is the single place that starts or pauses a decoder in
    /// response to focus, so focus handling cannot diverge between the
    /// request and change paths.
    async fn reconcile_focus(&mut self) -> Result<()> {
        match self.focus_level {
            AudioFocus::NoFocusNoDuck => {
                if self.state.is_playing() {
                    if let Some(player) = self.current_player_if_prepared() {
                        self.checkpoint = player.position().await?;
                        player.pause().await?;
                    }
                    // Intent survives so playback resumes on focus gain.
                    self.set_state(RendererState::FocusLost);
                }
            }
            AudioFocus::NoFocusCanDuck | AudioFocus::Focused => {
                let volume = if self.focus_level == AudioFocus::Focused {
                    self.config.normal_volume
                } else {
                    self.config.duck_volume
                };

                if let Some(player) = self.current_player_if_prepared() {
                    player.set_volume(volume, volume).await?;

                    if self.play_on_focus_gain && !self.state.is_playing() {
                        player.start().await?;
                        self.set_state(RendererState::Playing);
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn next_index(&self) -> usize {
        1 - self.current
    }

    fn classify(&self, id: PlayerId) -> SlotRole {
        if self.slots[self.current].matches(id) {
            SlotRole::Current
        } else if self.slots[self.next_index()].matches(id) {
            SlotRole::Next
        } else {
            SlotRole::Unknown
        }
    }

    fn current_player_if_prepared(&self) -> Option<Arc<dyn MediaPlayer>> {
        let slot = &self.slots[self.current];
        if slot.prepared {
            slot.player.clone()
        } else {
            None
        }
    }

    fn set_state(&mut self, state: RendererState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "State transition");
            self.state = state;
            self.events.emit(RendererEvent::StateChanged(state));
        }
    }
}
