//! The host document abstraction.
//!
//! The engine is headless: it never owns nodes or a render tree. A host
//! implements [`Document`] to expose viewport metrics, which nodes carry the
//! reveal marker, their current geometry, and to receive class mutations.
//! Nodes are referenced by opaque [`NodeId`]s with weak semantics: the
//! document owns node lifetime, so geometry lookups return `Option` and a
//! vanished node is simply skipped.
//!
//! [`MemoryDocument`] is a complete in-memory implementation used by the demo
//! binary and the test suites.

use std::collections::BTreeSet;

use crate::geometry::{Rect, Viewport};

/// Opaque handle to a node owned by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Host-side view of the document the engine operates on.
pub trait Document {
    /// Current viewport metrics (height and scroll offsets).
    fn viewport(&self) -> Viewport;

    /// Snapshot of all nodes currently carrying the reveal marker, in
    /// document order.
    fn tracked_nodes(&self) -> Vec<NodeId>;

    /// The node's bounding rect relative to the viewport, or `None` if the
    /// node no longer exists.
    fn node_rect(&self, id: NodeId) -> Option<Rect>;

    /// The reveal marker's string value for this node, if it has one. A
    /// non-empty value becomes an extra class applied on visibility.
    fn reveal_token(&self, id: NodeId) -> Option<String>;

    /// Add classes to a node's class list. Missing nodes are ignored.
    fn add_classes(&mut self, id: NodeId, classes: &[String]);

    /// Remove classes from a node's class list. Missing nodes are ignored.
    fn remove_classes(&mut self, id: NodeId, classes: &[String]);

    /// Whether the host can deliver structural-change notifications. Hosts
    /// without them degrade to scroll/resize-driven recomputation only.
    fn supports_mutation_events(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    id: NodeId,
    /// Bounding rect in document space (fixed regardless of scroll).
    rect: Rect,
    /// Reveal marker value; `None` means the node is not tracked.
    token: Option<String>,
    classes: BTreeSet<String>,
}

/// A simple owned document: nodes with document-space rects, a scrollable
/// viewport, and per-node class sets.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    viewport: Viewport,
    next_id: u64,
    mutation_events: bool,
}

impl MemoryDocument {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            nodes: Vec::new(),
            viewport: Viewport::new(viewport_height),
            next_id: 1,
            mutation_events: true,
        }
    }

    /// Disable structural-change notification support, for hosts (and tests)
    /// exercising the degraded path.
    pub fn without_mutation_events(mut self) -> Self {
        self.mutation_events = false;
        self
    }

    /// Insert a tracked node at a document-space position. `token` is the
    /// reveal marker value (empty string for a bare marker).
    pub fn insert_tracked(&mut self, top: f64, height: f64, token: &str) -> NodeId {
        self.insert_node(top, height, Some(token.to_string()))
    }

    /// Insert an untracked node (present in the document, ignored by the
    /// engine).
    pub fn insert_plain(&mut self, top: f64, height: f64) -> NodeId {
        self.insert_node(top, height, None)
    }

    fn insert_node(&mut self, top: f64, height: f64, token: Option<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(MemoryNode {
            id,
            rect: Rect::new(top, 0.0, 0.0, height),
            token,
            classes: BTreeSet::new(),
        });
        id
    }

    /// Remove a node entirely.
    pub fn remove_node(&mut self, id: NodeId) {
        self.nodes.retain(|n| n.id != id);
    }

    /// Move a node to a new document-space top (layout change).
    pub fn set_node_top(&mut self, id: NodeId, top: f64) {
        if let Some(node) = self.node_mut(id) {
            node.rect.top = top;
        }
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.viewport.scroll_top = scroll_top;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport.height = height;
    }

    pub fn scroll_top(&self) -> f64 {
        self.viewport.scroll_top
    }

    /// Document-space rect of a node, independent of scroll.
    pub fn document_rect(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.rect)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.classes.contains(class))
    }

    pub fn classes(&self, id: NodeId) -> Vec<String> {
        self.node(id)
            .map(|n| n.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Bottom edge of the lowest node, used by hosts to clamp scrolling.
    pub fn content_height(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.rect.bottom())
            .fold(0.0, f64::max)
    }

    fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemoryNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

impl Document for MemoryDocument {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn tracked_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.token.is_some())
            .map(|n| n.id)
            .collect()
    }

    fn node_rect(&self, id: NodeId) -> Option<Rect> {
        // Hosts report viewport-relative geometry, like a bounding client
        // rect.
        let node = self.node(id)?;
        Some(Rect::new(
            node.rect.top - self.viewport.scroll_top,
            node.rect.left - self.viewport.scroll_left,
            node.rect.width,
            node.rect.height,
        ))
    }

    fn reveal_token(&self, id: NodeId) -> Option<String> {
        self.node(id)?.token.clone()
    }

    fn add_classes(&mut self, id: NodeId, classes: &[String]) {
        if let Some(node) = self.node_mut(id) {
            for class in classes {
                node.classes.insert(class.clone());
            }
        }
    }

    fn remove_classes(&mut self, id: NodeId, classes: &[String]) {
        if let Some(node) = self.node_mut(id) {
            for class in classes {
                node.classes.remove(class);
            }
        }
    }

    fn supports_mutation_events(&self) -> bool {
        self.mutation_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::absolute_offset;

    #[test]
    fn test_tracked_nodes_skip_plain() {
        let mut doc = MemoryDocument::new(800.0);
        let a = doc.insert_tracked(100.0, 50.0, "fade-up");
        doc.insert_plain(200.0, 50.0);
        let b = doc.insert_tracked(300.0, 50.0, "");
        assert_eq!(doc.tracked_nodes(), vec![a, b]);
    }

    #[test]
    fn test_node_rect_is_viewport_relative() {
        let mut doc = MemoryDocument::new(800.0);
        let id = doc.insert_tracked(1000.0, 50.0, "");
        doc.set_scroll_top(400.0);

        let rect = doc.node_rect(id).unwrap();
        assert_eq!(rect.top, 600.0);
        // Resolving back through the viewport recovers document space.
        let offset = absolute_offset(&rect, &doc.viewport());
        assert_eq!(offset.top, 1000.0);
    }

    #[test]
    fn test_class_mutations_on_missing_node_are_ignored() {
        let mut doc = MemoryDocument::new(800.0);
        let id = doc.insert_tracked(100.0, 50.0, "");
        doc.remove_node(id);
        doc.add_classes(id, &["aos-animate".to_string()]);
        assert!(doc.node_rect(id).is_none());
        assert!(!doc.has_class(id, "aos-animate"));
    }

    #[test]
    fn test_content_height() {
        let mut doc = MemoryDocument::new(800.0);
        doc.insert_tracked(100.0, 50.0, "");
        doc.insert_plain(900.0, 120.0);
        assert_eq!(doc.content_height(), 1020.0);
    }
}
