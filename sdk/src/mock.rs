//! Deterministic provider twin for exercising the pipeline without a real
//! embed API.
//!
//! The mock splits the provider into two halves:
//! - [`MockBridge`] is handed to the auditor and behaves like any other
//!   [`ProviderBridge`].
//! - [`MockRemote`] stays with the test (or demo) and plays the provider's
//!   role: it registers players, signals library readiness, mutates live
//!   player state, and emits raw state-change notifications.
//!
//! Dropping the remote closes the notification stream, which is how a test
//! tells a running auditor that the session is over.

use crate::auditor::PlaybackEvent;
use crate::bridge::{PlayerHandle, ProviderBridge, RawPlayerState, StateChange};
use crate::ready::{ReadyBroker, ReadySignal};
use crate::sink::EventSink;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
struct Registry {
    players: Mutex<IndexMap<String, MockPlayer>>,
    broker: ReadyBroker,
}

/// In-process stand-in for a provider's embed API.
#[derive(Debug)]
pub struct MockBridge<R> {
    registry: Arc<Registry>,
    notifications: Option<mpsc::UnboundedReceiver<StateChange<R>>>,
}

impl<R: RawPlayerState> MockBridge<R> {
    /// Create a bridge for the pipeline and the remote that drives it.
    pub fn new() -> (Self, MockRemote<R>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = Arc::new(Registry {
            players: Mutex::new(IndexMap::new()),
            broker: ReadyBroker::new(),
        });
        (
            Self {
                registry: Arc::clone(&registry),
                notifications: Some(rx),
            },
            MockRemote { registry, tx },
        )
    }
}

impl<R: RawPlayerState> ProviderBridge for MockBridge<R> {
    type Raw = R;
    type Handle = MockPlayer;

    fn readiness(&self) -> ReadySignal {
        self.registry.broker.subscribe()
    }

    fn bind(&mut self, target_id: &str) -> eyre::Result<MockPlayer> {
        let players = self.registry.players.lock().expect("player registry lock");
        match players.get(target_id) {
            Some(player) => Ok(player.clone()),
            None => eyre::bail!("no mock player registered for target {target_id}"),
        }
    }

    fn notifications(&mut self) -> eyre::Result<mpsc::UnboundedReceiver<StateChange<R>>> {
        self.notifications
            .take()
            .ok_or_else(|| eyre::eyre!("notification stream was already taken"))
    }
}

/// Driver half of a [`MockBridge`].
#[derive(Debug)]
pub struct MockRemote<R> {
    registry: Arc<Registry>,
    tx: mpsc::UnboundedSender<StateChange<R>>,
}

impl<R> MockRemote<R> {
    /// Register a player the bridge can later bind for `target_id`.
    pub fn add_player(
        &self,
        target_id: impl Into<String>,
        video_id: impl Into<String>,
        position_seconds: f64,
    ) -> MockPlayer {
        let player = MockPlayer::new(video_id, position_seconds);
        self.registry
            .players
            .lock()
            .expect("player registry lock")
            .insert(target_id.into(), player.clone());
        player
    }

    /// Announce that the provider's client library has finished loading.
    pub fn signal_ready(&self) {
        self.registry.broker.signal_ready();
    }

    /// Emit a raw state change for `target_id`.
    pub fn emit(&self, target_id: impl Into<String>, state: R) {
        // send fails only when the consuming auditor is already gone
        let _ = self.tx.send(StateChange {
            target_id: target_id.into(),
            state,
        });
    }

    pub fn player(&self, target_id: &str) -> Option<MockPlayer> {
        self.registry
            .players
            .lock()
            .expect("player registry lock")
            .get(target_id)
            .cloned()
    }

    /// Swap the video loaded in a registered player, as a playlist advance
    /// would.
    pub fn set_video(&self, target_id: &str, video_id: impl Into<String>) {
        self.player(target_id)
            .expect("target was registered")
            .load_video(video_id);
    }

    /// Move a registered player's playhead.
    pub fn set_position(&self, target_id: &str, seconds: f64) {
        self.player(target_id)
            .expect("target was registered")
            .seek(seconds);
    }
}

#[derive(Debug)]
struct PlayerData {
    video_id: String,
    position_seconds: f64,
}

/// Shared-state player handle: every clone sees mutations immediately, so
/// the auditor's reads reflect the state at notification time.
#[derive(Debug, Clone)]
pub struct MockPlayer {
    data: Arc<Mutex<PlayerData>>,
}

impl MockPlayer {
    fn new(video_id: impl Into<String>, position_seconds: f64) -> Self {
        Self {
            data: Arc::new(Mutex::new(PlayerData {
                video_id: video_id.into(),
                position_seconds,
            })),
        }
    }

    pub fn load_video(&self, video_id: impl Into<String>) {
        self.data.lock().expect("player state lock").video_id = video_id.into();
    }

    pub fn seek(&self, seconds: f64) {
        self.data.lock().expect("player state lock").position_seconds = seconds;
    }
}

impl PlayerHandle for MockPlayer {
    fn video_id(&self) -> String {
        self.data.lock().expect("player state lock").video_id.clone()
    }

    fn current_time_seconds(&self) -> f64 {
        self.data.lock().expect("player state lock").position_seconds
    }
}

/// Sink that captures events in arrival order for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PlaybackEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.lock().expect("recorded events lock").clone()
    }

    /// Wait until at least `count` events have been recorded.
    ///
    /// Panics after five seconds so a broken pipeline fails the test instead
    /// of hanging it.
    pub async fn wait_for(&self, count: usize) {
        let seen = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if self.events.lock().expect("recorded events lock").len() >= count {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await;
        if seen.is_err() {
            panic!(
                "sink saw {} events, expected at least {count}",
                self.events().len()
            );
        }
    }
}

impl EventSink for RecordingSink {
    fn record(&mut self, event: PlaybackEvent) {
        self.events
            .lock()
            .expect("recorded events lock")
            .push(event);
    }
}

enum Step<R> {
    Ready,
    State { target_id: String, state: R },
    LoadVideo { target_id: String, video_id: String },
    Seek { target_id: String, seconds: f64 },
}

/// A named sequence of provider-side actions replayed against a
/// [`MockRemote`], optionally with a fixed delay between steps.
pub struct PlaybackScript<R> {
    name: String,
    steps: Vec<Step<R>>,
    delay: Duration,
}

impl<R> PlaybackScript<R>
where
    R: RawPlayerState + std::fmt::Debug,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// Pause this long after each step.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Signal provider readiness at this point in the script.
    pub fn ready(mut self) -> Self {
        self.steps.push(Step::Ready);
        self
    }

    /// Emit a raw state change for `target_id`.
    pub fn state(mut self, target_id: impl Into<String>, state: R) -> Self {
        self.steps.push(Step::State {
            target_id: target_id.into(),
            state,
        });
        self
    }

    /// Swap the video loaded in `target_id`'s player.
    pub fn load_video(mut self, target_id: impl Into<String>, video_id: impl Into<String>) -> Self {
        self.steps.push(Step::LoadVideo {
            target_id: target_id.into(),
            video_id: video_id.into(),
        });
        self
    }

    /// Move `target_id`'s playhead.
    pub fn seek(mut self, target_id: impl Into<String>, seconds: f64) -> Self {
        self.steps.push(Step::Seek {
            target_id: target_id.into(),
            seconds,
        });
        self
    }

    /// Replay every step against `remote`, in order.
    pub async fn play_out(self, remote: &MockRemote<R>) {
        tracing::info!(script = %self.name, "playing out scripted session");
        for step in self.steps {
            match step {
                Step::Ready => {
                    tracing::debug!(script = %self.name, "scripted readiness signal");
                    remote.signal_ready();
                }
                Step::State { target_id, state } => {
                    tracing::debug!(
                        script = %self.name,
                        target = %target_id,
                        ?state,
                        "scripted state change"
                    );
                    remote.emit(target_id, state);
                }
                Step::LoadVideo {
                    target_id,
                    video_id,
                } => remote.set_video(&target_id, video_id),
                Step::Seek { target_id, seconds } => remote.set_position(&target_id, seconds),
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        tracing::info!(script = %self.name, "scripted session complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::PlaybackPhase;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy)]
    struct AlwaysPlaying;

    impl RawPlayerState for AlwaysPlaying {
        fn phase(&self) -> PlaybackPhase {
            PlaybackPhase::Playing
        }
    }

    #[tokio::test]
    async fn binding_an_unregistered_target_fails() {
        let (mut bridge, _remote) = MockBridge::<AlwaysPlaying>::new();
        let err = bridge.bind("ghost").unwrap_err();
        insta::assert_snapshot!(err, @"no mock player registered for target ghost");
    }

    #[tokio::test]
    async fn notification_stream_can_be_taken_only_once() {
        let (mut bridge, _remote) = MockBridge::<AlwaysPlaying>::new();
        bridge.notifications().unwrap();
        let err = bridge.notifications().unwrap_err();
        insta::assert_snapshot!(err, @"notification stream was already taken");
    }

    #[tokio::test]
    async fn remote_mutations_are_visible_through_bound_handles() {
        let (mut bridge, remote) = MockBridge::<AlwaysPlaying>::new();
        remote.add_player("a", "vid-1", 0.0);
        let handle = bridge.bind("a").unwrap();

        remote.set_video("a", "vid-2");
        remote.set_position("a", 42.5);

        assert_eq!(handle.video_id(), "vid-2");
        assert_eq!(handle.current_time_seconds(), 42.5);
    }

    #[tokio::test]
    async fn scripts_replay_steps_in_order() {
        let (mut bridge, remote) = MockBridge::<AlwaysPlaying>::new();
        remote.add_player("a", "vid-1", 0.0);
        let mut notifications = bridge.notifications().unwrap();

        PlaybackScript::new("short session")
            .ready()
            .seek("a", 7.0)
            .state("a", AlwaysPlaying)
            .play_out(&remote)
            .await;

        assert!(remote.registry.broker.is_ready());
        let change = notifications.recv().await.unwrap();
        assert_eq!(change.target_id, "a");
        let handle = bridge.bind("a").unwrap();
        assert_eq!(handle.current_time_seconds(), 7.0);
    }
}
