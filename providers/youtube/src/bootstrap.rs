//! Loading the provider's frame API into a page.

use embed_audit_sdk::page::{Document, Element};

/// Bootstrap URL for the frame API, as served by the provider.
pub const PLAYER_API_URL: &str = "http://www.youtube.com/player_api";

/// Insert the frame-API bootstrap script into `doc`.
///
/// The tag lands immediately before the first existing script element in
/// document order, or at the end of the top level when the page has no
/// script at all. A page already carrying the bootstrap tag is left
/// untouched, so constructing several audits against one page still loads
/// the library once.
///
/// Returns `true` if a tag was inserted.
pub fn inject_player_api(doc: &mut Document) -> bool {
    let present = doc
        .elements()
        .any(|el| el.tag() == "script" && el.attribute("src") == Some(PLAYER_API_URL));
    if present {
        return false;
    }

    doc.insert_before_first(
        "script",
        Element::new("script").with_attribute("src", PLAYER_API_URL),
    );
    true
}
