//! # Player Slots
//!
//! The renderer keeps a fixed arena of two decoder slots: the current
//! track and an optional pre-buffered next track. Gapless advance is an
//! index swap between the two, never a data copy.

use std::sync::Arc;

use bridge_traits::player::{MediaPlayer, PlayerId};

use crate::error::Result;
use crate::track::TrackResource;

/// One decoder slot in the renderer arena.
pub(crate) struct PlayerSlot {
    /// Identity of the allocated player, if any. Kept after release so
    /// stale signals remain attributable in logs.
    pub id: Option<PlayerId>,
    pub player: Option<Arc<dyn MediaPlayer>>,
    pub track: Option<TrackResource>,
    /// Set only by a `Prepared` signal from this slot's player.
    pub prepared: bool,
    pub session_id: Option<u32>,
}

impl PlayerSlot {
    pub fn empty() -> Self {
        Self {
            id: None,
            player: None,
            track: None,
            prepared: false,
            session_id: None,
        }
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    pub fn matches(&self, id: PlayerId) -> bool {
        self.id == Some(id) && self.player.is_some()
    }

    /// Detach the data source but keep the decoder allocated for reuse.
    pub async fn soft_reset(&mut self) -> Result<()> {
        if let Some(player) = &self.player {
            player.reset().await?;
        }
        self.track = None;
        self.prepared = false;
        self.session_id = None;
        Ok(())
    }

    /// Free the decoder entirely. The slot must be re-populated through
    /// the factory before the next use.
    pub async fn release(&mut self) -> Result<()> {
        if let Some(player) = self.player.take() {
            player.reset().await?;
            player.release().await?;
        }
        self.track = None;
        self.prepared = false;
        self.session_id = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_matches_nothing() {
        let slot = PlayerSlot::empty();
        assert!(!slot.has_track());
        assert!(!slot.matches(PlayerId(0)));
    }
}
