//! Per-element trigger windows and visibility evaluation.
//!
//! Each tracked element carries a [`TriggerWindow`]: the scroll positions in
//! document px at which it enters (and, in mirror mode, leaves) the visible
//! state. Windows are rebuilt on every geometry-affecting event (resize and
//! structural mutation): a stale window after a layout change is a
//! correctness bug, not an optimization opportunity.

use crate::config::Config;
use crate::document::{Document, NodeId};
use crate::geometry::absolute_offset;

/// Scroll-position thresholds bounding an element's visible state, in
/// document px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerWindow {
    /// Scroll position at which the element's top edge crosses the trigger
    /// line (viewport height minus the configured offset).
    pub enter: f64,
    /// Scroll position at which the element's bottom edge passes back above
    /// the trigger line. Only set in mirror mode; `None` means the trigger is
    /// one-way.
    pub exit: Option<f64>,
}

/// One node under visibility tracking.
#[derive(Debug, Clone)]
pub struct TrackedElement {
    pub node: NodeId,
    /// Base animated class plus the node's reveal token, when non-empty.
    pub classes: Vec<String>,
    pub once: bool,
    pub mirror: bool,
    pub window: TriggerWindow,
    /// Latches on first true-visibility evaluation; with `once` set this
    /// stops any later class removal, including mirror's exit behavior.
    pub triggered: bool,
}

/// Compute a node's trigger window from its current geometry, or `None` if
/// the node is gone from the document.
pub fn build_window<D: Document>(
    doc: &D,
    node: NodeId,
    offset: f64,
    mirror: bool,
) -> Option<TriggerWindow> {
    let viewport = doc.viewport();
    let rect = doc.node_rect(node)?;
    let top = absolute_offset(&rect, &viewport).top;
    Some(TriggerWindow {
        enter: top - viewport.height + offset,
        exit: mirror.then(|| top + rect.height - offset),
    })
}

/// Whether a scroll position falls inside the window's half-open interval
/// `[enter, exit)`; a one-way window never closes.
#[inline]
pub fn is_visible(scroll_top: f64, window: &TriggerWindow) -> bool {
    scroll_top >= window.enter && window.exit.is_none_or(|exit| scroll_top < exit)
}

impl TrackedElement {
    /// Build a tracked element from a node, tagging it with the init class.
    /// Returns `None` when the node has no geometry (already detached).
    pub fn track<D: Document>(doc: &mut D, node: NodeId, config: &Config) -> Option<Self> {
        let window = build_window(doc, node, config.offset, config.mirror)?;

        let mut classes = vec![config.animated_class_name.clone()];
        match doc.reveal_token(node) {
            Some(token) if !token.is_empty() => classes.push(token),
            _ => {}
        }

        if !config.init_class_name.is_empty() {
            doc.add_classes(node, std::slice::from_ref(&config.init_class_name));
        }

        Some(Self {
            node,
            classes,
            once: config.once,
            mirror: config.mirror,
            window,
            triggered: false,
        })
    }

    /// Recompute the trigger window from current geometry. Returns false when
    /// the node has vanished; its stale window is left alone and evaluation
    /// skips it via the document lookup.
    pub fn rebuild_window<D: Document>(&mut self, doc: &D, offset: f64) -> bool {
        match build_window(doc, self.node, offset, self.mirror) {
            Some(window) => {
                self.window = window;
                true
            }
            None => false,
        }
    }
}

/// Snapshot every marked node in the document into a fresh tracked set.
pub fn snapshot<D: Document>(doc: &mut D, config: &Config) -> Vec<TrackedElement> {
    doc.tracked_nodes()
        .into_iter()
        .filter_map(|node| TrackedElement::track(doc, node, config))
        .collect()
}

/// Apply or remove each element's class set according to the current scroll
/// position. Idempotent: re-running against an unchanged position converges
/// to the same class state.
pub fn evaluate<D: Document>(doc: &mut D, elements: &mut [TrackedElement], scroll_top: f64) {
    for el in elements.iter_mut() {
        if el.once && el.triggered {
            // Latched; never un-toggle, even in mirror mode.
            continue;
        }
        if is_visible(scroll_top, &el.window) {
            doc.add_classes(el.node, &el.classes);
            el.triggered = true;
        } else {
            doc.remove_classes(el.node, &el.classes);
        }
    }
}
