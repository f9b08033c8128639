//! The capability surface a provider integration hands to the pipeline.
//!
//! A bridge wraps whatever machinery actually talks to the provider's player
//! objects. It has exactly three jobs: expose the library's one-time
//! readiness signal, bind a player to a target, and route raw state-change
//! notifications back out. Classifying and filtering those notifications is
//! the auditor's business, not the bridge's.

use crate::ready::ReadySignal;
use tokio::sync::mpsc;

/// Coarse classification of a provider's raw player states.
///
/// Only [`PlaybackPhase::Playing`] and [`PlaybackPhase::Paused`] ever
/// produce records; everything else is deliberately not captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Playing,
    Paused,
    Other,
}

/// A provider's raw state vocabulary.
pub trait RawPlayerState {
    fn phase(&self) -> PlaybackPhase;
}

/// One raw state-change notification, routed verbatim from the provider.
#[derive(Debug, Clone)]
pub struct StateChange<R> {
    /// Id of the target whose player changed state.
    pub target_id: String,
    /// The provider's raw state at the time of the change.
    pub state: R,
}

/// A bound player instance.
///
/// Both accessors read the player's state **at call time**; the video loaded
/// in a player can change over its lifetime (playlists advance), so values
/// must never be cached from bind time.
pub trait PlayerHandle {
    fn video_id(&self) -> String;
    fn current_time_seconds(&self) -> f64;
}

/// Asynchronously loaded provider embed API, as seen by the pipeline.
pub trait ProviderBridge {
    type Raw: RawPlayerState;
    type Handle: PlayerHandle;

    /// Signal that resolves once the provider's client library has loaded.
    ///
    /// [`ProviderBridge::bind`] may only be called after this resolves.
    fn readiness(&self) -> ReadySignal;

    /// Attach a player to the embed identified by `target_id`.
    fn bind(&mut self, target_id: &str) -> eyre::Result<Self::Handle>;

    /// Take the stream of raw state-change notifications.
    ///
    /// The stream carries notifications for every handle this bridge ever
    /// binds and can be taken exactly once; a second call is an error.
    fn notifications(&mut self) -> eyre::Result<mpsc::UnboundedReceiver<StateChange<Self::Raw>>>;
}
