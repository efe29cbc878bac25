// Collapsible navigation and same-page smooth scrolling.
// The nav container is shown by flipping its inline display between "block"
// and the stylesheet default; anchor clicks targeting an existing element are
// intercepted and turned into a smooth scroll request, collapsing the nav on
// narrow viewports.

use crate::dom::{Document, NodeId};

/// Viewport width below which the page uses the narrow layout.
pub const NARROW_VIEWPORT: u32 = 900;

const NAV_TOGGLE_ID: &str = "navToggle";
const MAIN_NAV_ID: &str = "mainNav";

/// A scroll the page should perform, aligned smooth to the block start,
/// mirroring `scrollIntoView({behavior: 'smooth', block: 'start'})`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
}

/// Flips the collapsible nav between open and default. No-op when either the
/// toggle control or the nav container is missing.
pub fn toggle(doc: &mut Document) {
    if doc.by_id(NAV_TOGGLE_ID).is_none() {
        return;
    }
    let Some(nav) = doc.by_id(MAIN_NAV_ID) else {
        return;
    };
    if let Some(el) = doc.element_mut(nav) {
        let open = el.style("display").as_deref() == Some("block");
        el.set_style("display", if open { "" } else { "block" });
    }
}

/// Enter on the toggle control synthesizes the click behavior.
pub fn toggle_key(doc: &mut Document, key: &str) {
    if key == "Enter" {
        toggle(doc);
    }
}

/// Whether the nav container is currently forced open.
pub fn is_open(doc: &Document) -> bool {
    doc.by_id(MAIN_NAV_ID)
        .and_then(|id| doc.element(id))
        .and_then(|el| el.style("display"))
        .as_deref()
        == Some("block")
}

/// Handles a click on a same-page anchor. Returns the scroll to perform when
/// the link is intercepted; `None` leaves the default behavior untouched
/// (no matching target, or not a same-page anchor at all).
pub fn anchor_click(doc: &mut Document, anchor: NodeId, viewport_width: u32) -> Option<ScrollRequest> {
    let href = doc.element(anchor)?.attr("href")?.to_string();
    if !href.starts_with('#') || href.len() <= 1 {
        return None;
    }
    let target = doc.by_id(&href[1..])?;
    if viewport_width < NARROW_VIEWPORT {
        if let Some(nav) = doc.by_id(MAIN_NAV_ID) {
            if let Some(el) = doc.element_mut(nav) {
                el.set_style("display", "");
            }
        }
    }
    Some(ScrollRequest { target })
}
