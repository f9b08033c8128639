//! Recognizing YouTube player frames by their `src` URL.

use embed_audit_sdk::locator::EmbedPattern;
use url::Url;

/// Hosts that serve the embeddable player, including the privacy-enhanced
/// variant.
const EMBED_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

/// Embed pattern for YouTube player frames.
///
/// Matching is case-insensitive and accepts both `http` and `https`, with or
/// without the `www.` prefix; `Url::parse` normalizes scheme and host case
/// before the host comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTubeEmbeds;

impl EmbedPattern for YouTubeEmbeds {
    fn matches_src(&self, src: &str) -> bool {
        let Ok(url) = Url::parse(src) else {
            return false;
        };
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| EMBED_HOSTS.contains(&host))
    }

    fn id_prefix(&self) -> &str {
        "yt-audit-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_player_urls_on_every_known_host() {
        let accepted = [
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "http://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "https://youtube-nocookie.com/embed/dQw4w9WgXcQ",
            "HTTPS://WWW.YOUTUBE.COM/embed/dQw4w9WgXcQ",
            "https://www.youtube.com",
        ];
        for src in accepted {
            assert!(YouTubeEmbeds.matches_src(src), "should accept {src}");
        }
    }

    #[test]
    fn rejects_other_hosts_and_schemes() {
        let rejected = [
            "https://player.vimeo.com/video/1",
            "https://www.youtube.com.evil.example/embed/x",
            "https://notyoutube.com/embed/x",
            "https://m.youtube.com/embed/x",
            "ftp://www.youtube.com/embed/x",
            "/embed/dQw4w9WgXcQ",
            "",
        ];
        for src in rejected {
            assert!(!YouTubeEmbeds.matches_src(src), "should reject {src}");
        }
    }
}
