//! The provider's raw player state vocabulary.

use embed_audit_sdk::bridge::{PlaybackPhase, RawPlayerState};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Player states as reported by the frame API, with the provider's numeric
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize_repr, Serialize_repr)]
#[repr(i8)]
pub enum PlayerState {
    Unstarted = -1,
    Ended = 0,
    Playing = 1,
    Paused = 2,
    Buffering = 3,
    Cued = 5,
}

impl RawPlayerState for PlayerState {
    fn phase(&self) -> PlaybackPhase {
        match self {
            PlayerState::Playing => PlaybackPhase::Playing,
            PlayerState::Paused => PlaybackPhase::Paused,
            PlayerState::Unstarted
            | PlayerState::Ended
            | PlayerState::Buffering
            | PlayerState::Cued => PlaybackPhase::Other,
        }
    }
}
