//! Discovery of provider embeds in a page tree.

use crate::page::Document;
use std::collections::HashSet;

/// Provider-side knowledge needed to recognize its embeds in a page.
///
/// The locator stays provider-neutral; a provider crate supplies the host
/// matching rules and the prefix used when synthesizing element ids.
pub trait EmbedPattern {
    /// Tag name of the embeddable elements this provider uses.
    fn frame_tag(&self) -> &str {
        "iframe"
    }

    /// Whether a frame's `src` URL points at this provider's player.
    fn matches_src(&self, src: &str) -> bool;

    /// Prefix for ids synthesized onto matching frames that have none.
    fn id_prefix(&self) -> &str;
}

/// One embeddable surface the pipeline can bind a player to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedTarget {
    pub id: String,
}

/// Outcome of [`discover`].
///
/// A page with frames that just don't belong to the provider is a different
/// caller-observable case from a page with no frames at all, so the two are
/// kept apart here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// The tree contained no frame elements of any kind.
    NoFrames,
    /// Frames were present; these are the ones matching the provider's
    /// pattern, in document order. May be empty.
    Frames(Vec<EmbedTarget>),
}

impl Discovery {
    /// The matched targets, treating a frameless page as zero matches.
    pub fn into_targets(self) -> Vec<EmbedTarget> {
        match self {
            Discovery::NoFrames => Vec::new(),
            Discovery::Frames(targets) => targets,
        }
    }
}

/// Scan `doc` for frames whose `src` matches `pattern`, in document order.
///
/// Matching frames without an `id` get one synthesized from the pattern's
/// prefix and a counter, skipping ids already present anywhere in the tree.
/// The synthesized id is written back onto the element, so discovering the
/// same tree again returns the same ids.
pub fn discover(doc: &mut Document, pattern: &impl EmbedPattern) -> Discovery {
    let taken: HashSet<String> = doc
        .elements()
        .filter_map(|el| el.attribute("id"))
        .map(String::from)
        .collect();

    let mut frames = 0usize;
    let mut serial = 0usize;
    let mut targets = Vec::new();

    doc.for_each_element_mut(|el| {
        if el.tag() != pattern.frame_tag() {
            return;
        }
        frames += 1;

        let matched = el
            .attribute("src")
            .is_some_and(|src| pattern.matches_src(src));
        if !matched {
            return;
        }

        let id = match el.attribute("id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let mut candidate = format!("{}{serial}", pattern.id_prefix());
                while taken.contains(&candidate) {
                    serial += 1;
                    candidate = format!("{}{serial}", pattern.id_prefix());
                }
                serial += 1;
                el.set_attribute("id", candidate.clone());
                candidate
            }
        };
        targets.push(EmbedTarget { id });
    });

    if frames == 0 {
        Discovery::NoFrames
    } else {
        Discovery::Frames(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;
    use pretty_assertions::assert_eq;

    struct ExamplePlayer;

    impl EmbedPattern for ExamplePlayer {
        fn matches_src(&self, src: &str) -> bool {
            src.starts_with("https://player.example.com/")
        }

        fn id_prefix(&self) -> &str {
            "ex-player-"
        }
    }

    fn frame(src: &str) -> Element {
        Element::new("iframe").with_attribute("src", src)
    }

    #[test]
    fn only_matching_frames_are_returned() {
        let mut doc = Document::new();
        doc.push(frame("https://player.example.com/v/1").with_attribute("id", "first"));
        doc.push(frame("https://elsewhere.example.org/v/2"));
        doc.push(frame("https://player.example.com/v/3").with_attribute("id", "third"));

        let Discovery::Frames(targets) = discover(&mut doc, &ExamplePlayer) else {
            panic!("frames were present");
        };
        let ids: Vec<_> = targets.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["first", "third"]);
    }

    #[test]
    fn missing_ids_are_synthesized_and_written_back() {
        let mut doc = Document::new();
        doc.push(frame("https://player.example.com/v/1"));

        let Discovery::Frames(targets) = discover(&mut doc, &ExamplePlayer) else {
            panic!("frames were present");
        };
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "ex-player-0");

        let el = doc.elements().find(|el| el.tag() == "iframe").unwrap();
        assert_eq!(el.attribute("id"), Some("ex-player-0"));
    }

    #[test]
    fn repeat_discovery_returns_the_same_ids() {
        let mut doc = Document::new();
        doc.push(frame("https://player.example.com/v/1"));
        doc.push(frame("https://player.example.com/v/2"));

        let first = discover(&mut doc, &ExamplePlayer).into_targets();
        let second = discover(&mut doc, &ExamplePlayer).into_targets();
        assert_eq!(first, second);
    }

    #[test]
    fn synthesized_ids_skip_ones_already_taken() {
        let mut doc = Document::new();
        doc.push(Element::new("div").with_attribute("id", "ex-player-0"));
        doc.push(frame("https://player.example.com/v/1"));

        let targets = discover(&mut doc, &ExamplePlayer).into_targets();
        assert_eq!(targets[0].id, "ex-player-1");
    }

    #[test]
    fn frameless_page_is_distinct_from_no_matches() {
        let mut empty = Document::new();
        empty.push(Element::new("body"));
        assert_eq!(discover(&mut empty, &ExamplePlayer), Discovery::NoFrames);

        let mut unmatched = Document::new();
        unmatched.push(frame("https://elsewhere.example.org/v/1"));
        assert_eq!(
            discover(&mut unmatched, &ExamplePlayer),
            Discovery::Frames(Vec::new())
        );
    }

    #[test]
    fn empty_id_attribute_counts_as_missing() {
        let mut doc = Document::new();
        doc.push(frame("https://player.example.com/v/1").with_attribute("id", ""));

        let targets = discover(&mut doc, &ExamplePlayer).into_targets();
        assert_eq!(targets[0].id, "ex-player-0");
    }
}
