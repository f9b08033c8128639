//! Pluggable destinations for captured playback events.

use crate::auditor::{PlayAction, PlaybackEvent};
use serde::Serialize;

/// Destination for captured playback events.
///
/// `record` consumes the event exactly once and must not fail for a
/// well-formed event; sinks with real failure modes (network transports)
/// deal with them internally. The pipeline never retries or buffers on a
/// sink's behalf.
pub trait EventSink {
    fn record(&mut self, event: PlaybackEvent);
}

/// The record a transport serializes for one captured event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub user_action: PlayAction,
    pub user_id: String,
    pub video_id: String,
    pub timecode: f64,
}

impl AuditRecord {
    pub fn new(user_id: impl Into<String>, event: &PlaybackEvent) -> Self {
        Self {
            user_action: event.action,
            user_id: user_id.into(),
            video_id: event.video_id.clone(),
            timecode: event.timecode_seconds,
        }
    }
}

/// Sink that group-logs each event's fields under the auditing user's
/// identity.
///
/// Holds an optional endpoint so integrators swapping in a real transport
/// keep the same construction surface; this sink itself only ever writes to
/// the log.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    user_id: String,
    endpoint: Option<String>,
}

impl ConsoleSink {
    pub fn new(user_id: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

impl EventSink for ConsoleSink {
    fn record(&mut self, event: PlaybackEvent) {
        let record = AuditRecord::new(&self.user_id, &event);
        tracing::info!(
            user = %record.user_id,
            action = %record.user_action,
            video = %record.video_id,
            timecode = record.timecode,
            "user playback action"
        );
    }
}
