//! # Renderer Events
//!
//! Typed notifications emitted by the renderer over a
//! `tokio::sync::broadcast` channel. Multiple subscribers can listen
//! independently; a subscriber that falls behind observes
//! `RecvError::Lagged` and continues from the newest events.
//!
//! ## Usage
//!
//! ```ignore
//! let mut events = renderer.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("renderer: {:?}", event);
//!     }
//! });
//! ```

use tokio::sync::broadcast;

use crate::state::RendererState;

/// Notification emitted by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    /// The externally visible state changed.
    StateChanged(RendererState),
    /// The pre-buffered next track was promoted to current.
    WentToNext,
    /// The current track played to its end and no next track was queued.
    Completed,
    /// The current decoder reported its audio session identifier.
    AudioSession(u32),
    /// A non-fatal or fatal problem worth surfacing to the consumer.
    Error { message: String },
}

/// Broadcast sender plus subscribe handle for renderer events.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<RendererEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RendererEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Events without subscribers are dropped silently.
    pub fn emit(&self, event: RendererEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(RendererEvent::StateChanged(RendererState::Playing));
        bus.emit(RendererEvent::WentToNext);

        assert_eq!(
            rx.recv().await.unwrap(),
            RendererEvent::StateChanged(RendererState::Playing)
        );
        assert_eq!(rx.recv().await.unwrap(), RendererEvent::WentToNext);
    }

    #[test]
    fn emit_without_subscribers_is_silent() {
        let bus = EventBus::new(8);
        bus.emit(RendererEvent::Completed);
    }
}
