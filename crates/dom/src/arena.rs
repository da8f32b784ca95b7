//! Arena-based document tree storage.
//!
//! Nodes live sequentially in a single `Vec` and reference each other by
//! u32 index. `remove` detaches a subtree without freeing its slots, so a
//! handle to a detached node stays valid while selectors (which walk from
//! the root) no longer see it.
//!
//! ```text
//! Document: Vec<DomNode>
//!           [Node0][Node1][Node2]...
//!            ↑ 4-byte index, not 8-byte pointer
//! ```

use crate::error::{DomError, Result};
use crate::events::EventRegistry;
use crate::types::{DomNode, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// Structural insertion point relative to a target node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    /// Previous sibling of the target.
    BeforeBegin,
    /// First child of the target.
    AfterBegin,
    /// Last child of the target.
    #[default]
    BeforeEnd,
    /// Next sibling of the target.
    AfterEnd,
}

/// The document tree: node arena, root, focus slot, listener registry.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<DomNode>,
    root_id: NodeId,
    focused: Option<NodeId>,
    pub(crate) registry: EventRegistry,
}

impl Document {
    /// Create an empty document holding only the `#document` root.
    pub fn new() -> Self {
        let root = DomNode::new(0, NodeType::Document, "#document".to_string());
        Self {
            nodes: vec![root],
            root_id: 0,
            focused: None,
            registry: EventRegistry::default(),
        }
    }

    /// Parse a full markup string into a new document.
    pub fn parse(markup: &str) -> Result<Self> {
        let mut doc = Self::new();
        let roots = crate::parser::parse_fragment(&mut doc, markup)?;
        for root in roots {
            doc.insert(root, doc.root_id, Position::BeforeEnd)?;
        }
        Ok(doc)
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Get node by ID (immutable).
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable).
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Whether the handle points at a node of this document.
    pub fn contains(&self, node_id: NodeId) -> bool {
        (node_id as usize) < self.nodes.len()
    }

    /// Total number of nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeType::Element, tag.to_ascii_lowercase())
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.push_node(NodeType::Text, "#text".to_string());
        self.nodes[id as usize].node_value = text.to_string();
        id
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        let id = self.push_node(NodeType::Comment, "#comment".to_string());
        self.nodes[id as usize].node_value = text.to_string();
        id
    }

    fn push_node(&mut self, node_type: NodeType, node_name: String) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(DomNode::new(id, node_type, node_name));
        id
    }

    pub fn parent_of(&self, node_id: NodeId) -> Option<NodeId> {
        self.get(node_id).ok().and_then(|n| n.parent_id)
    }

    /// Insert `node_id` relative to `target_id`, detaching it from any
    /// previous parent first.
    pub fn insert(&mut self, node_id: NodeId, target_id: NodeId, position: Position) -> Result<()> {
        self.get(node_id)?;
        self.get(target_id)?;
        if node_id == target_id || self.is_descendant_of(target_id, node_id) {
            return Err(DomError::InvalidInsertion(
                "node would contain itself".to_string(),
            ));
        }

        self.detach(node_id)?;
        match position {
            Position::AfterBegin => {
                self.get_mut(target_id)?.children_ids.insert(0, node_id);
                self.get_mut(node_id)?.parent_id = Some(target_id);
            }
            Position::BeforeEnd => {
                self.get_mut(target_id)?.children_ids.push(node_id);
                self.get_mut(node_id)?.parent_id = Some(target_id);
            }
            Position::BeforeBegin | Position::AfterEnd => {
                let parent_id = self.get(target_id)?.parent_id.ok_or_else(|| {
                    DomError::InvalidInsertion("target has no parent".to_string())
                })?;
                let parent = self.get_mut(parent_id)?;
                let idx = parent
                    .children_ids
                    .iter()
                    .position(|&c| c == target_id)
                    .ok_or_else(|| {
                        DomError::InvalidInsertion("target detached from parent".to_string())
                    })?;
                let at = if position == Position::BeforeBegin {
                    idx
                } else {
                    idx + 1
                };
                parent.children_ids.insert(at, node_id);
                self.get_mut(node_id)?.parent_id = Some(parent_id);
            }
        }
        Ok(())
    }

    /// Detach a node (and its subtree) from its parent. No-op when already
    /// detached. A focused node that leaves the tree loses focus.
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let Some(parent_id) = self.get(node_id)?.parent_id else {
            return Ok(());
        };
        let parent = self.get_mut(parent_id)?;
        parent.children_ids.retain(|c| *c != node_id);
        self.get_mut(node_id)?.parent_id = None;

        if let Some(focused) = self.focused {
            if !self.is_connected(focused) {
                self.focused = None;
            }
        }
        Ok(())
    }

    /// Detach every child of a node, keeping the children alive in the arena.
    pub fn clear_children(&mut self, node_id: NodeId) -> Result<()> {
        let children: Vec<NodeId> = self.get(node_id)?.children_ids.to_vec();
        for child in children {
            self.get_mut(child)?.parent_id = None;
        }
        self.get_mut(node_id)?.children_ids.clear();
        Ok(())
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor_id: NodeId) -> bool {
        let mut cursor = self.parent_of(node_id);
        while let Some(current) = cursor {
            if current == ancestor_id {
                return true;
            }
            cursor = self.parent_of(current);
        }
        false
    }

    /// A node is connected when walking parents reaches the root.
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == self.root_id || self.is_descendant_of(node_id, self.root_id)
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(scope) {
            Ok(node) => node.children_ids.iter().rev().copied().collect(),
            Err(_) => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Ok(node) = self.get(id) {
                for &child in node.children_ids.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Traverse the subtree depth-first (iterative, no recursion).
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];
        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;
            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }
        Ok(())
    }

    /// Find all connected nodes matching a predicate, in document order.
    pub fn find<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        std::iter::once(self.root_id)
            .chain(self.descendants(self.root_id))
            .filter(|&id| self.get(id).map(|n| predicate(n)).unwrap_or(false))
            .collect()
    }

    /// Find the first connected node matching a predicate.
    pub fn find_one<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&DomNode) -> bool,
    {
        std::iter::once(self.root_id)
            .chain(self.descendants(self.root_id))
            .find(|&id| self.get(id).map(|n| predicate(n)).unwrap_or(false))
    }

    /// Find element by `id` attribute, anywhere in the connected tree.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_one(|node| node.is_element() && node.attr("id") == Some(id))
    }

    /// Find all elements by tag name.
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.tag_name().is_some_and(|t| t.eq_ignore_ascii_case(tag)))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_one(|node| node.tag_name() == Some("head"))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_one(|node| node.tag_name() == Some("body"))
    }

    /// Concatenated text of every text node in the subtree, verbatim.
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let mut text = String::new();
        self.traverse_df(node_id, |node| {
            if node.node_type == NodeType::Text {
                text.push_str(&node.node_value);
            }
            Ok(())
        })?;
        Ok(text)
    }

    /// Replace a node's children with a single text node holding `text`
    /// verbatim. Escaping happens at serialization, never in the tree.
    pub fn set_text(&mut self, node_id: NodeId, text: &str) -> Result<()> {
        self.clear_children(node_id)?;
        let text_id = self.create_text(text);
        self.insert(text_id, node_id, Position::BeforeEnd)
    }

    /// Replace a node's children with a parsed markup fragment.
    pub fn set_markup(&mut self, node_id: NodeId, markup: &str) -> Result<()> {
        let roots = crate::parser::parse_fragment(self, markup)?;
        self.clear_children(node_id)?;
        for root in roots {
            self.insert(root, node_id, Position::BeforeEnd)?;
        }
        Ok(())
    }

    /// The currently focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn set_focused(&mut self, node_id: Option<NodeId>) {
        self.focused = node_id;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
