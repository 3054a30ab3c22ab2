//! Document tree: an owned arena of nodes addressed by [`NodeId`].
//!
//! The tree is decoupled from any rendering framework. Viewers build it (or
//! load it from HTML with [`Document::parse_html`]), hand it to the walker,
//! and read it back once translation has rewritten the text leaves.
//!
//! Nodes are never removed from the arena. [`Document::detach`] unlinks a
//! subtree from its parent and marks it detached, so a `NodeId` held by an
//! in-flight translation stays valid and writes into it fail cleanly.

pub mod html;
pub mod session;
pub mod walker;

use thiserror::Error;

pub use session::TranslationSession;
pub use walker::{apply_structure_safe_write, collect_translatable_units, TranslatableUnit};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is detached from the document")]
    Detached(NodeId),

    #[error("node {0} is not a text node")]
    NotText(NodeId),

    #[error("node {0} changed since it was collected")]
    Stale(NodeId),

    #[error("node {0} cannot have children")]
    NotContainer(NodeId),

    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The root of every document
    Document,
    Doctype(String),
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

impl NodeData {
    fn can_have_children(&self) -> bool {
        matches!(self, NodeData::Document | NodeData::Element { .. })
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
    attached: bool,
}

/// Owned document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
                attached: true,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes.get(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes.get_mut(id.0).ok_or(DocumentError::UnknownNode(id))
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, DocumentError> {
        let parent_node = self.node(parent)?;
        if !parent_node.data.can_have_children() {
            return Err(DocumentError::NotContainer(parent));
        }
        let attached = parent_node.attached;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
            attached,
        });
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attrs: Vec<(String, String)>,
    ) -> Result<NodeId, DocumentError> {
        self.append(
            parent,
            NodeData::Element {
                name: name.into(),
                attrs,
            },
        )
    }

    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        self.append(parent, NodeData::Text(text.into()))
    }

    pub fn append_comment(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        self.append(parent, NodeData::Comment(text.into()))
    }

    pub fn append_doctype(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        self.append(parent, NodeData::Doctype(name.into()))
    }

    /// Unlink `id` and its subtree from the tree.
    ///
    /// The nodes keep their ids and data but are no longer reachable from the
    /// root, and every write into them fails with [`DocumentError::Detached`].
    pub fn detach(&mut self, id: NodeId) -> Result<(), DocumentError> {
        if id == self.root() {
            return Err(DocumentError::NotContainer(id));
        }

        if let Some(parent) = self.node_mut(id)?.parent.take() {
            self.node_mut(parent)?.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current)?;
            node.attached = false;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|node| &node.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|node| node.attached)
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Element name, for element nodes.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replace the content of an attached text node.
    ///
    /// Only the node's own text changes: its parent, siblings and every
    /// element around it stay exactly as they were.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DocumentError> {
        let node = self.node_mut(id)?;
        if !node.attached {
            return Err(DocumentError::Detached(id));
        }
        match &mut node.data {
            NodeData::Text(existing) => {
                *existing = text.into();
                Ok(())
            }
            _ => Err(DocumentError::NotText(id)),
        }
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if id.0 < self.nodes.len() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants { doc: self, stack }
    }

    /// First element named `name` (ASCII case-insensitive) below the root.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root()).find(|id| {
            self.element_name(*id)
                .is_some_and(|element| element.eq_ignore_ascii_case(name))
        })
    }

    /// Number of element nodes in the subtree rooted at `id`.
    pub fn element_count(&self, id: NodeId) -> usize {
        self.descendants(id)
            .filter(|node| matches!(self.data(*node), Some(NodeData::Element { .. })))
            .count()
    }

    /// Concatenated text of every text node below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }
}

/// Pre-order iterator over a subtree, see [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}
