//! Arena-based document tree.
//!
//! Nodes are indexed by `NodeId`. Shadow subtrees hang off their host via
//! `shadow_root` and are NOT reachable through `children` — plain traversal
//! stays in the light tree, mirroring shadow encapsulation. A shadow root's
//! `parent` is its host, so ancestor walks cross the boundary.

use serde::{Deserialize, Serialize};

use crate::types::collections::{FxHashMap, FxHashSet};

use super::geometry::Rect;
use super::selector::SelectorList;

/// Index into the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node: an element, a text node (`name == "#text"`), or a shadow root
/// (`name == "#shadow-root"`).
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub name: String,
    pub attrs: FxHashMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub shadow_root: Option<NodeId>,
    pub rect: Rect,
    pub scroll_container: bool,
    pub editable: bool,
    pub detached: bool,
}

/// A document mutation reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children were added to or removed from `target`.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// A text node's content changed.
    CharacterData { target: NodeId },
    /// An attribute changed on `target`.
    Attributes { target: NodeId, name: String },
}

impl MutationRecord {
    /// The nodes this record makes interesting for re-testing.
    pub fn touched(&self) -> Vec<NodeId> {
        match self {
            Self::ChildList { added, .. } => added.clone(),
            Self::CharacterData { target } | Self::Attributes { target, .. } => {
                vec![*target]
            }
        }
    }
}

/// The in-memory document.
pub struct DocumentTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    page_path: String,
    viewport: Rect,
    selection: Option<NodeId>,
    style_sheets: Vec<String>,
    styled_shadow_hosts: FxHashSet<NodeId>,
}

impl DocumentTree {
    /// Create a document with an empty `body` root.
    pub fn new(page_path: &str) -> Self {
        let body = NodeData {
            name: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            page_path: page_path.to_string(),
            viewport: Rect::new(0.0, 0.0, 1280.0, 800.0),
            selection: None,
            style_sheets: Vec::new(),
            styled_shadow_hosts: FxHashSet::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, rect: Rect) {
        self.viewport = rect;
    }

    /// The node currently inside the user's selection/caret, if any.
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn set_selection(&mut self, node: Option<NodeId>) {
        self.selection = node;
    }

    // ─── Construction ───────────────────────────────────────────────────

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Append an element under `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.push(NodeData {
            name: name.to_ascii_lowercase(),
            parent: Some(parent),
            ..NodeData::default()
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push(NodeData {
            name: "#text".to_string(),
            text: text.to_string(),
            parent: Some(parent),
            ..NodeData::default()
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Attach an open shadow root to `host`. The root's parent is the host,
    /// but it is not one of the host's children.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let id = self.push(NodeData {
            name: "#shadow-root".to_string(),
            parent: Some(host),
            ..NodeData::default()
        });
        self.nodes[host.index()].shadow_root = Some(id);
        id
    }

    /// Detach a node (and implicitly its subtree) from the document.
    pub fn remove_node(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.index()].parent {
            self.nodes[parent.index()].children.retain(|&c| c != node);
        }
        self.nodes[node.index()].detached = true;
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.index()]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.nodes[node.index()].attrs.remove(name);
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.nodes[node.index()].text = text.to_string();
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.index()].rect = rect;
    }

    pub fn set_scroll_container(&mut self, node: NodeId, scrollable: bool) {
        self.nodes[node.index()].scroll_container = scrollable;
    }

    pub fn set_editable(&mut self, node: NodeId, editable: bool) {
        self.nodes[node.index()].editable = editable;
    }

    /// Register a style sheet name attached to the document. Propagated into
    /// shadow scopes by the collector.
    pub fn add_style_sheet(&mut self, name: &str) {
        self.style_sheets.push(name.to_string());
    }

    /// Propagate attached style sheets into a shadow host's scope. Returns
    /// true the first time for each host, false on repeats.
    pub fn adopt_styles_into_shadow(&mut self, host: NodeId) -> bool {
        self.styled_shadow_hosts.insert(host)
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn element_name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].name
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        !self.nodes[node.index()].name.starts_with('#')
    }

    pub fn is_detached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.nodes[id.index()].detached {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.index()].attrs.get(name).map(String::as_str)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    pub fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].shadow_root
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.nodes[node.index()].rect
    }

    pub fn is_scroll_container(&self, node: NodeId) -> bool {
        self.nodes[node.index()].scroll_container
    }

    pub fn is_editable_region(&self, node: NodeId) -> bool {
        self.nodes[node.index()].editable
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ─── Traversal & queries ────────────────────────────────────────────

    /// Preorder light-tree descendants of `root` (excluding `root` itself
    /// and all shadow subtrees).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Elements under any of `roots` (light tree only) matching `selector`,
    /// in document order.
    pub fn query(&self, selector: &SelectorList, roots: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in roots {
            for node in self.descendants(root) {
                if self.is_element(node) && selector.matches(self, node) {
                    out.push(node);
                }
            }
        }
        out
    }

    /// Find an element by id, searching the light tree and all shadow trees.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len() as u32)
            .map(NodeId)
            .find(|&n| !self.nodes[n.index()].detached && self.attr(n, "id") == Some(id))
    }

    /// Concatenated text of the node's light subtree, whitespace-joined.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.nodes[node.index()].name == "#text" {
            parts.push(self.nodes[node.index()].text.trim());
        }
        for child in self.descendants(node) {
            let data = &self.nodes[child.index()];
            if data.name == "#text" && !data.text.trim().is_empty() {
                parts.push(data.text.trim());
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Accessible text alternative: aria-label → aria-labelledby → alt →
    /// title. `None` when no source exists at all.
    pub fn accessible_text(&self, node: NodeId) -> Option<String> {
        if let Some(label) = self.attr(node, "aria-label") {
            return Some(label.to_string());
        }
        if let Some(ids) = self.attr(node, "aria-labelledby") {
            let joined = ids
                .split_ascii_whitespace()
                .filter_map(|id| self.find_by_id(id))
                .map(|n| self.text_content(n))
                .collect::<Vec<_>>()
                .join(" ");
            return Some(joined);
        }
        if let Some(alt) = self.attr(node, "alt") {
            return Some(alt.to_string());
        }
        self.attr(node, "title").map(str::to_string)
    }

    /// Nearest ancestor (crossing shadow boundaries) for which `pred` holds.
    pub fn closest<F>(&self, node: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Self, NodeId) -> bool,
    {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if pred(self, id) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// The nearest scrollable ancestor, if any.
    pub fn scrollable_parent(&self, node: NodeId) -> Option<NodeId> {
        self.closest(node, |doc, id| doc.is_scroll_container(id))
    }

    /// Whether `node` is inside (or is) `ancestor`, crossing shadow
    /// boundaries.
    pub fn is_inside(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Preorder position of every node, including shadow subtrees (a shadow
    /// tree sorts directly after its host). Recomputed once per scan.
    pub fn document_positions(&self) -> FxHashMap<NodeId, u32> {
        let mut positions = FxHashMap::default();
        let mut counter = 0u32;
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            positions.insert(node, counter);
            counter += 1;
            // Push light children after the shadow root so the shadow
            // subtree pops (and numbers) first.
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
            if let Some(shadow) = self.shadow_root(node) {
                stack.push(shadow);
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_joins_descendants() {
        let mut doc = DocumentTree::new("/t");
        let p = doc.append_element(doc.root(), "p");
        doc.append_text(p, "Hello");
        let strong = doc.append_element(p, "strong");
        doc.append_text(strong, "world");
        assert_eq!(doc.text_content(p), "Hello world");
    }

    #[test]
    fn test_accessible_text_fallback_order() {
        let mut doc = DocumentTree::new("/t");
        let img = doc.append_element(doc.root(), "img");
        assert_eq!(doc.accessible_text(img), None);
        doc.set_attr(img, "title", "from title");
        assert_eq!(doc.accessible_text(img).as_deref(), Some("from title"));
        doc.set_attr(img, "alt", "from alt");
        assert_eq!(doc.accessible_text(img).as_deref(), Some("from alt"));
        doc.set_attr(img, "aria-label", "from aria");
        assert_eq!(doc.accessible_text(img).as_deref(), Some("from aria"));
    }

    #[test]
    fn test_aria_labelledby_resolves_ids() {
        let mut doc = DocumentTree::new("/t");
        let label = doc.append_element(doc.root(), "span");
        doc.set_attr(label, "id", "cap");
        doc.append_text(label, "A caption");
        let img = doc.append_element(doc.root(), "img");
        doc.set_attr(img, "aria-labelledby", "cap");
        assert_eq!(doc.accessible_text(img).as_deref(), Some("A caption"));
    }

    #[test]
    fn test_descendants_skip_shadow_trees() {
        let mut doc = DocumentTree::new("/t");
        let host = doc.append_element(doc.root(), "x-card");
        let shadow = doc.attach_shadow(host);
        let inner = doc.append_element(shadow, "img");
        let all = doc.descendants(doc.root());
        assert!(all.contains(&host));
        assert!(!all.contains(&inner));
        // Ancestor walk still crosses the boundary.
        assert!(doc.is_inside(inner, doc.root()));
    }

    #[test]
    fn test_positions_cover_shadow_subtrees() {
        let mut doc = DocumentTree::new("/t");
        let host = doc.append_element(doc.root(), "x-card");
        let shadow = doc.attach_shadow(host);
        let inner = doc.append_element(shadow, "img");
        let after = doc.append_element(doc.root(), "p");
        let positions = doc.document_positions();
        assert!(positions[&inner] > positions[&host]);
        assert!(positions[&after] > positions[&inner]);
    }

    #[test]
    fn test_adopt_styles_only_once_per_host() {
        let mut doc = DocumentTree::new("/t");
        let host = doc.append_element(doc.root(), "x-card");
        doc.attach_shadow(host);
        assert!(doc.adopt_styles_into_shadow(host));
        assert!(!doc.adopt_styles_into_shadow(host));
    }

    #[test]
    fn test_removed_subtree_is_detached() {
        let mut doc = DocumentTree::new("/t");
        let p = doc.append_element(doc.root(), "p");
        let child = doc.append_text(p, "x");
        doc.remove_node(p);
        assert!(doc.is_detached(p));
        assert!(doc.is_detached(child));
    }
}
