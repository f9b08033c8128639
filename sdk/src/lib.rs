//! Capture-and-forward pipeline for playback events from asynchronously
//! loaded third-party embeds.
//!
//! A page hosts players served by an external provider whose client library
//! arrives asynchronously. This crate discovers those embeds
//! ([`locator::discover`]), waits for the provider library through a
//! [`ready::ReadyBroker`], binds one player per embed via the
//! [`bridge::ProviderBridge`] capability, and translates play/pause state
//! changes into [`auditor::PlaybackEvent`]s handed synchronously to an
//! [`sink::EventSink`].
//!
//! Provider specifics — host patterns, raw state codes, the machinery behind
//! the bridge — live in provider crates; see `embed-audit-youtube` for the
//! in-tree one. The `mock` feature exposes a deterministic provider twin for
//! tests and demos.

pub mod auditor;
pub mod bridge;
pub mod locator;
pub mod page;
pub mod ready;
pub mod sink;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use auditor::{AuditorConfig, PlayAction, PlaybackAuditor, PlaybackEvent};
pub use bridge::{PlaybackPhase, PlayerHandle, ProviderBridge, RawPlayerState, StateChange};
pub use locator::{Discovery, EmbedPattern, EmbedTarget, discover};
pub use ready::{ReadyBroker, ReadySignal};
pub use sink::{AuditRecord, ConsoleSink, EventSink};
