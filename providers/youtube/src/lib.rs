//! Playback auditing for YouTube player embeds.
//!
//! Ties the provider-neutral pipeline from `embed-audit-sdk` to YouTube:
//! [`pattern::YouTubeEmbeds`] recognizes player frames,
//! [`player::PlayerState`] mirrors the frame API's numeric state codes, and
//! [`bootstrap`] loads the frame API into a page. [`audit_page`] is the
//! one-call construction surface for all of it.
//!
//! The machinery that would drive a [`ProviderBridge`] from the real frame
//! API is the embedding host's to supply; the demo binary drives everything
//! through the sdk's mock bridge instead.

pub mod bootstrap;
pub mod pattern;
pub mod player;

use embed_audit_sdk::auditor::{AuditorConfig, PlaybackAuditor};
use embed_audit_sdk::bridge::ProviderBridge;
use embed_audit_sdk::page::Document;
use embed_audit_sdk::sink::ConsoleSink;
use pattern::YouTubeEmbeds;
use std::time::Duration;

/// Options for [`audit_page`].
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    /// Collector a real transport would ship records to. The console sink
    /// holds it but never contacts it.
    pub endpoint: Option<String>,

    /// Frames to audit. When absent the page is scanned for player frames.
    pub target_ids: Option<Vec<String>>,

    /// Upper bound on the wait for the frame API to load. Without one a
    /// library that never loads means the audit waits forever and records
    /// nothing.
    pub readiness_timeout: Option<Duration>,
}

/// A configured page audit, ready to run.
pub struct PageAudit<B: ProviderBridge> {
    auditor: PlaybackAuditor<B, ConsoleSink>,
    targets: Vec<String>,
}

impl<B: ProviderBridge> PageAudit<B> {
    /// The frame ids this audit will bind to, in resolution order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Run the capture loop to completion.
    pub async fn run(self) -> eyre::Result<()> {
        self.auditor.run(self.targets).await
    }
}

/// Set up playback auditing for the YouTube embeds on a page.
///
/// Injects the frame-API bootstrap script, resolves the frames to audit
/// (explicit ids in `options` win over discovery, which writes synthesized
/// ids back into `doc`), and wires a console sink attributing actions to
/// `user_id` (an empty id is recorded as `anonymous`). Players are bound
/// once `bridge` signals readiness, when the returned audit is run.
pub fn audit_page<B: ProviderBridge>(
    doc: &mut Document,
    user_id: &str,
    options: AuditOptions,
    bridge: B,
) -> PageAudit<B> {
    let user_id = if user_id.is_empty() {
        "anonymous"
    } else {
        user_id
    };

    bootstrap::inject_player_api(doc);

    let mut config = AuditorConfig::builder();
    config.user_id(user_id);
    if let Some(ids) = options.target_ids {
        config.target_ids(ids);
    }
    if let Some(limit) = options.readiness_timeout {
        config.readiness_timeout(limit);
    }
    let config = config.build().expect("user id is always set");

    let sink = ConsoleSink::new(user_id, options.endpoint);
    let auditor = PlaybackAuditor::new(config, bridge, sink);
    let targets = auditor.resolve_targets(doc, &YouTubeEmbeds);
    PageAudit { auditor, targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerState;
    use embed_audit_sdk::auditor::PlayAction;
    use embed_audit_sdk::mock::{MockBridge, PlaybackScript, RecordingSink};
    use embed_audit_sdk::page::Element;
    use pretty_assertions::assert_eq;

    fn page_with_embeds() -> Document {
        let mut doc = Document::new();
        doc.push(Element::new("script").with_attribute("src", "https://cdn.example.com/app.js"));
        doc.push(
            Element::new("iframe")
                .with_attribute("src", "https://www.youtube.com/embed/dQw4w9WgXcQ"),
        );
        doc.push(
            Element::new("iframe").with_attribute("src", "https://player.vimeo.com/video/1"),
        );
        doc.push(
            Element::new("iframe")
                .with_attribute("src", "https://www.youtube-nocookie.com/embed/9bZkp7q19f0")
                .with_attribute("id", "promo-video"),
        );
        doc
    }

    #[test]
    fn audit_page_discovers_frames_and_injects_the_bootstrap() {
        let mut doc = page_with_embeds();
        let (bridge, _remote) = MockBridge::<PlayerState>::new();
        let audit = audit_page(&mut doc, "Penny0659", AuditOptions::default(), bridge);

        assert_eq!(audit.targets(), ["yt-audit-0", "promo-video"]);
        assert!(
            doc.elements()
                .any(|el| el.attribute("src") == Some(bootstrap::PLAYER_API_URL))
        );
    }

    #[test]
    fn empty_user_id_is_recorded_as_anonymous() {
        let mut doc = page_with_embeds();
        let (bridge, _remote) = MockBridge::<PlayerState>::new();
        let audit = audit_page(&mut doc, "", AuditOptions::default(), bridge);
        assert_eq!(audit.auditor.config().user_id(), "anonymous");
    }

    #[test]
    fn explicit_target_ids_skip_discovery() {
        let mut doc = page_with_embeds();
        let (bridge, _remote) = MockBridge::<PlayerState>::new();
        let options = AuditOptions {
            target_ids: Some(vec!["promo-video".to_string()]),
            ..AuditOptions::default()
        };
        let audit = audit_page(&mut doc, "Penny0659", options, bridge);
        assert_eq!(audit.targets(), ["promo-video"]);
    }

    #[tokio::test]
    async fn discovered_frames_produce_records_end_to_end() {
        let mut doc = page_with_embeds();
        let (bridge, remote) = MockBridge::<PlayerState>::new();
        let sink = RecordingSink::new();
        let config = AuditorConfig::builder()
            .user_id("Penny0659")
            .build()
            .unwrap();
        let auditor = PlaybackAuditor::new(config, bridge, sink.clone());

        let targets = auditor.resolve_targets(&mut doc, &YouTubeEmbeds);
        assert_eq!(targets, ["yt-audit-0", "promo-video"]);

        remote.add_player("yt-audit-0", "dQw4w9WgXcQ", 4.5);
        remote.add_player("promo-video", "9bZkp7q19f0", 0.0);

        let run = tokio::spawn(auditor.run(targets));
        PlaybackScript::new("viewing session")
            .ready()
            .state("yt-audit-0", PlayerState::Buffering)
            .state("yt-audit-0", PlayerState::Playing)
            .state("promo-video", PlayerState::Playing)
            .state("yt-audit-0", PlayerState::Paused)
            .play_out(&remote)
            .await;
        sink.wait_for(3).await;
        drop(remote);
        run.await.unwrap().unwrap();

        let events = sink.events();
        let summary: Vec<_> = events
            .iter()
            .map(|e| (e.target_id.as_str(), e.video_id.as_str(), e.action))
            .collect();
        assert_eq!(
            summary,
            [
                ("yt-audit-0", "dQw4w9WgXcQ", PlayAction::Play),
                ("promo-video", "9bZkp7q19f0", PlayAction::Play),
                ("yt-audit-0", "dQw4w9WgXcQ", PlayAction::Pause),
            ]
        );
    }
}
