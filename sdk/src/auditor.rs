//! The capture loop: bind players, translate state changes, forward events.

use crate::bridge::{PlaybackPhase, PlayerHandle, ProviderBridge, StateChange};
use crate::locator::{self, Discovery, EmbedPattern};
use crate::page::Document;
use crate::sink::EventSink;
use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The two user actions worth recording.
///
/// Providers report many more states (buffering, cued, ended, ...); those
/// are filtered out on purpose rather than recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PlayAction {
    #[serde(rename = "play")]
    Play,
    #[serde(rename = "paused")]
    Pause,
}

impl PlayAction {
    /// Wire name of the action, as it appears in emitted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayAction::Play => "play",
            PlayAction::Pause => "paused",
        }
    }
}

impl std::fmt::Display for PlayAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured playback transition, consumed exactly once by the sink.
///
/// `video_id` and `timecode_seconds` are read from the player at the moment
/// of the underlying notification, never from bind time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackEvent {
    pub target_id: String,
    pub video_id: String,
    pub action: PlayAction,
    pub timecode_seconds: f64,
}

/// Immutable per-auditor configuration.
#[derive(Debug, Clone, Builder)]
pub struct AuditorConfig {
    /// Explicit embed ids to audit. When absent or empty, the auditor falls
    /// back to discovering embeds in the page.
    #[builder(setter(into, strip_option), default)]
    target_ids: Option<Vec<String>>,

    /// Identity the sink attributes recorded actions to.
    #[builder(setter(into))]
    user_id: String,

    /// Upper bound on the wait for provider readiness.
    ///
    /// Without one the auditor waits indefinitely, and a provider library
    /// that never loads means no events are ever produced.
    #[builder(setter(strip_option), default)]
    readiness_timeout: Option<Duration>,
}

impl AuditorConfig {
    pub fn builder() -> AuditorConfigBuilder {
        AuditorConfigBuilder::default()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Owns the audit lifecycle for one page: target resolution, player binding,
/// and the notification-to-record translation.
pub struct PlaybackAuditor<B: ProviderBridge, S> {
    config: AuditorConfig,
    bridge: B,
    sink: S,
    players: IndexMap<String, B::Handle>,
}

impl<B, S> PlaybackAuditor<B, S>
where
    B: ProviderBridge,
    S: EventSink,
{
    pub fn new(config: AuditorConfig, bridge: B, sink: S) -> Self {
        Self {
            config,
            bridge,
            sink,
            players: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &AuditorConfig {
        &self.config
    }

    /// Resolve the set of embeds this auditor will bind to.
    ///
    /// Explicit ids from the configuration win; otherwise the page is
    /// scanned with `pattern` (which writes synthesized ids back into `doc`).
    pub fn resolve_targets(&self, doc: &mut Document, pattern: &impl EmbedPattern) -> Vec<String> {
        if let Some(ids) = &self.config.target_ids
            && !ids.is_empty()
        {
            return ids.clone();
        }

        match locator::discover(doc, pattern) {
            Discovery::NoFrames => {
                tracing::warn!("page has no frame elements; nothing to audit");
                Vec::new()
            }
            Discovery::Frames(targets) => {
                if targets.is_empty() {
                    tracing::warn!("no frames on this page match the provider; nothing to audit");
                }
                targets.into_iter().map(|t| t.id).collect()
            }
        }
    }

    /// Run the capture loop to completion.
    ///
    /// Waits for provider readiness, binds one player per target in order,
    /// then forwards accepted state changes to the sink until the bridge's
    /// notification stream closes. An empty target list completes
    /// immediately and successfully.
    pub async fn run(mut self, target_ids: Vec<String>) -> eyre::Result<()> {
        if target_ids.is_empty() {
            tracing::warn!("no embeds to audit; not binding any players");
            return Ok(());
        }

        let ready = self.bridge.readiness();
        match self.config.readiness_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, ready.wait()).await.is_err() {
                    eyre::bail!("provider library did not become ready within {limit:?}");
                }
            }
            None => ready.wait().await,
        }

        for id in target_ids {
            // at most one handle per target; handles are never rebound
            if self.players.contains_key(&id) {
                continue;
            }
            match self.bridge.bind(&id) {
                Ok(handle) => {
                    tracing::debug!(target = %id, "bound player");
                    self.players.insert(id, handle);
                }
                Err(e) => {
                    tracing::warn!(target = %id, error = %e, "failed to bind player, skipping");
                }
            }
        }

        let mut notifications = self.bridge.notifications()?;
        while let Some(change) = notifications.recv().await {
            self.on_state_change(change);
        }

        Ok(())
    }

    fn on_state_change(&mut self, change: StateChange<B::Raw>) {
        use crate::bridge::RawPlayerState;

        let Some(player) = self.players.get(&change.target_id) else {
            tracing::trace!(target = %change.target_id, "state change for unbound target, ignoring");
            return;
        };

        let action = match change.state.phase() {
            PlaybackPhase::Playing => PlayAction::Play,
            PlaybackPhase::Paused => PlayAction::Pause,
            // every other provider state is deliberately not recorded
            PlaybackPhase::Other => return,
        };

        let event = PlaybackEvent {
            target_id: change.target_id,
            video_id: player.video_id(),
            action,
            timecode_seconds: player.current_time_seconds(),
        };
        self.sink.record(event);
    }
}
