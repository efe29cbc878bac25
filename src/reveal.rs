// Reveal-on-scroll: elements marked `.reveal` gain a permanent `visible`
// class once they intersect the viewport. One shared observer, one-way
// transition.

use crate::dom::{Document, NodeId};

/// Fraction of an element's area that must be visible before it reveals.
pub const REVEAL_THRESHOLD: f32 = 0.12;

/// One viewport-intersection report for an observed element.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionEntry {
    pub target: NodeId,
    /// Visible fraction of the element's area, 0.0 to 1.0.
    pub ratio: f32,
}

impl IntersectionEntry {
    pub fn is_intersecting(&self) -> bool {
        self.ratio >= REVEAL_THRESHOLD
    }
}

/// The shared observer over all `.reveal` elements.
pub struct RevealObserver {
    observed: Vec<NodeId>,
}

impl RevealObserver {
    /// Registers every element carrying the reveal marker.
    pub fn observe_all(doc: &Document) -> Self {
        Self {
            observed: doc.with_class("reveal"),
        }
    }

    pub fn observed(&self) -> &[NodeId] {
        &self.observed
    }

    /// Processes a batch of intersection reports. Intersecting targets gain
    /// the `visible` class; the transition never reverses, and repeated
    /// reports are no-ops in effect.
    pub fn on_entries(&self, doc: &mut Document, entries: &[IntersectionEntry]) {
        for entry in entries {
            if !entry.is_intersecting() {
                continue;
            }
            if !self.observed.contains(&entry.target) {
                continue;
            }
            if let Some(el) = doc.element_mut(entry.target) {
                el.add_class("visible");
            }
        }
    }
}
