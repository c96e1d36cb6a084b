//! The Document: an arena of elements plus the indexes the UI needs.

use std::collections::HashMap;
use std::fmt;

use botblocks_common::warning::warn_once;

use crate::element::{Element, ElementKind};

/// A type-safe index into a [`Document`]'s element arena.
///
/// Ids stay valid while their node is attached. The slots of nodes removed
/// by [`Document::clear_children`] are reused by later insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// The retained scene graph for one page.
///
/// Owns the element arena together with:
/// - the identifier map (`id` attribute → element),
/// - the click registry (`onclick` name → elements),
/// - the drawables list written by the last layout pass,
/// - the hover relation (which element is under the pointer).
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes, indexed by `NodeId`. The root is at index 0.
    nodes: Vec<Element>,
    /// Slots freed by `clear_children`, reused before the arena grows.
    free: Vec<NodeId>,
    /// Every holder of each `id`, in insertion order; the last one wins.
    ids: HashMap<String, Vec<NodeId>>,
    click_targets: HashMap<String, Vec<NodeId>>,
    /// Pre-order snapshot of the nodes placed by the last layout.
    drawables: Vec<NodeId>,
    hover: Option<NodeId>,
}

impl Document {
    /// Create a document whose root is `root`.
    #[must_use]
    pub fn new(root: Element) -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            ids: HashMap::new(),
            click_targets: HashMap::new(),
            drawables: Vec::new(),
            hover: None,
        };
        let id = document.alloc(root);
        document.index(id);
        document
    }

    /// The root element id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Number of arena slots, including freed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = element;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(element);
        id
    }

    /// Append `element` as the last child of `parent` and index it.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this document.
    pub fn append_child(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "append_child: unknown parent {parent:?}");
        element.parent = Some(parent);
        element.children.clear();
        let id = self.alloc(element);
        self.nodes[parent.0].children.push(id);
        self.index(id);
        id
    }

    /// Copy the whole of `fragment` under `parent`, returning the id the
    /// fragment's root received here.
    ///
    /// Used by callbacks that build UI on the fly (level-select buttons)
    /// from a parsed markup snippet.
    pub fn graft(&mut self, parent: NodeId, fragment: &Self) -> NodeId {
        self.graft_node(parent, fragment, fragment.root())
    }

    fn graft_node(&mut self, parent: NodeId, fragment: &Self, from: NodeId) -> NodeId {
        let mut element = fragment.nodes[from.0].clone();
        element.rect = None;
        let id = self.append_child(parent, element);
        for &child in &fragment.nodes[from.0].children {
            let _ = self.graft_node(id, fragment, child);
        }
        id
    }

    /// Remove every child of `parent` and everything below them from the
    /// identifier map and click registry, and free their slots.
    ///
    /// Invalidates the drawables list until the next layout.
    pub fn clear_children(&mut self, parent: NodeId) {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            for id in self.descendants(child).collect::<Vec<_>>() {
                self.unindex(id);
                if self.hover == Some(id) {
                    self.hover = None;
                }
                self.nodes[id.0] = Element::bare(ElementKind::Space);
                self.free.push(id);
            }
        }
        self.drawables.clear();
    }

    /// Record `id` in the identifier map and click registry.
    fn index(&mut self, id: NodeId) {
        let element = &self.nodes[id.0];
        if let Some(ident) = element.id.clone() {
            let holders = self.ids.entry(ident.clone()).or_default();
            if !holders.is_empty() {
                warn_once(
                    "dom",
                    &format!("duplicate id '{ident}', the last definition wins"),
                );
            }
            holders.push(id);
        }
        if let Some(name) = self.nodes[id.0].on_click.clone() {
            self.click_targets.entry(name).or_default().push(id);
        }
    }

    fn unindex(&mut self, id: NodeId) {
        let element = &self.nodes[id.0];
        if let Some(ident) = &element.id
            && let Some(holders) = self.ids.get_mut(ident)
        {
            holders.retain(|&h| h != id);
            if holders.is_empty() {
                let _ = self.ids.remove(ident);
            }
        }
        if let Some(name) = &element.on_click
            && let Some(targets) = self.click_targets.get_mut(name)
        {
            targets.retain(|&t| t != id);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Whether `id` is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == NodeId::ROOT {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Pre-order walk of `id` and everything below it.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            document: self,
            stack: vec![id],
        }
    }

    /// Element carrying the given `id` attribute.
    #[must_use]
    pub fn element_by_id(&self, ident: &str) -> Option<NodeId> {
        self.ids.get(ident).and_then(|holders| holders.last()).copied()
    }

    /// Elements bound to the named click callback, in registration order.
    #[must_use]
    pub fn click_targets(&self, name: &str) -> &[NodeId] {
        self.click_targets.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every click-callback name the document references.
    pub fn callback_names(&self) -> impl Iterator<Item = &str> {
        self.click_targets
            .iter()
            .filter(|(_, targets)| !targets.is_empty())
            .map(|(name, _)| name.as_str())
    }

    /// Nodes placed by the last layout, in paint order.
    #[must_use]
    pub fn drawables(&self) -> &[NodeId] {
        &self.drawables
    }

    /// Start a layout pass: forget the previous drawables.
    pub fn clear_drawables(&mut self) {
        self.drawables.clear();
    }

    /// Record a placed node. Called by the layout engine in pre-order.
    pub fn push_drawable(&mut self, id: NodeId) {
        self.drawables.push(id);
    }

    /// End a layout pass: drop the hover relation if its node was not placed.
    pub fn finish_layout(&mut self) {
        if let Some(hover) = self.hover
            && !self.drawables.contains(&hover)
        {
            self.hover = None;
        }
    }

    /// Element currently under the pointer.
    #[must_use]
    pub const fn hover(&self) -> Option<NodeId> {
        self.hover
    }

    /// Replace the hover relation.
    pub fn set_hover(&mut self, hover: Option<NodeId>) {
        self.hover = hover;
    }

    /// Write an indented dump of the subtree at `id`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the writer.
    pub fn write_tree(&self, out: &mut impl fmt::Write, id: NodeId, depth: usize) -> fmt::Result {
        let Some(element) = self.get(id) else {
            return Ok(());
        };
        let indent = "  ".repeat(depth);
        write!(out, "{indent}<{}", element.kind)?;
        for attr in &element.attrs {
            write!(out, " {}=\"{}\"", attr.name, attr.value)?;
        }
        write!(out, ">")?;
        if !element.text.is_empty() {
            write!(out, " \"{}\"", element.text)?;
        }
        if let Some(rect) = element.rect {
            write!(
                out,
                " @ ({}, {}) {}x{}",
                rect.x, rect.y, rect.width, rect.height
            )?;
        }
        writeln!(out)?;
        for &child in &element.children {
            self.write_tree(out, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, self.root(), 0)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.document.children(id).iter().rev().copied());
        Some(id)
    }
}
