use embed_audit_sdk::mock::{MockBridge, PlaybackScript};
use embed_audit_sdk::page::{Document, Element};
use embed_audit_youtube::player::PlayerState;
use embed_audit_youtube::{AuditOptions, audit_page};
use std::io::IsTerminal;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    // A stand-in for the page a real host would mirror in: one frame without
    // an id (discovery names it) and one already carrying its own.
    let mut page = Document::new();
    page.push(Element::new("script").with_attribute("src", "https://cdn.example.com/app.js"));
    page.push(
        Element::new("iframe").with_attribute("src", "https://www.youtube.com/embed/dQw4w9WgXcQ"),
    );
    page.push(
        Element::new("iframe")
            .with_attribute("src", "https://www.youtube-nocookie.com/embed/9bZkp7q19f0")
            .with_attribute("id", "promo-video"),
    );

    let (bridge, remote) = MockBridge::<PlayerState>::new();
    let options = AuditOptions {
        endpoint: Some("https://collector.example.com/events".to_string()),
        readiness_timeout: Some(Duration::from_secs(5)),
        ..AuditOptions::default()
    };
    let audit = audit_page(&mut page, "Penny0659", options, bridge);
    tracing::info!(targets = ?audit.targets(), "auditing player frames");

    let [main_frame, promo_frame] = audit.targets() else {
        eyre::bail!("expected the demo page to yield two player frames");
    };
    let (main_frame, promo_frame) = (main_frame.clone(), promo_frame.clone());

    remote.add_player(&main_frame, "dQw4w9WgXcQ", 0.0);
    remote.add_player(&promo_frame, "9bZkp7q19f0", 0.0);

    let run = tokio::spawn(audit.run());

    // What a short visit might look like: the main video plays, the viewer
    // skips ahead and pauses it, the player advances to the next playlist
    // entry, and the promo gets a brief look.
    PlaybackScript::new("demo viewing session")
        .with_delay(Duration::from_millis(150))
        .ready()
        .state(&main_frame, PlayerState::Buffering)
        .state(&main_frame, PlayerState::Playing)
        .seek(&main_frame, 42.5)
        .state(&main_frame, PlayerState::Paused)
        .load_video(&main_frame, "9bZkp7q19f0")
        .seek(&main_frame, 0.0)
        .state(&main_frame, PlayerState::Playing)
        .state(&promo_frame, PlayerState::Playing)
        .state(&promo_frame, PlayerState::Paused)
        .state(&main_frame, PlayerState::Ended)
        .play_out(&remote)
        .await;

    drop(remote);
    run.await??;

    Ok(())
}
