use crate::dom::element::ElementNode;
use crate::dom::selector::ClassSelector;
use crate::error::{PageError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Handle to a node stored in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag_name: String,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed DOM tree
///
/// Nodes are never freed; removing a child only detaches it, so a
/// [`NodeId`] stays valid for the lifetime of the document.
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
    /// Create an empty document holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    /// Build a document whose single top-level element is `root`
    pub fn from_element_tree(root: &ElementNode) -> Result<Self> {
        let mut document = Self::new();
        let document_node = document.root();
        document.insert_tree(document_node, root)?;
        Ok(document)
    }

    /// Parse an [`ElementNode`] fixture from JSON and build a document from it
    pub fn from_json(json: &str) -> Result<Self> {
        let root: ElementNode = serde_json::from_str(json)?;
        Self::from_element_tree(&root)
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// First element child of the document node
    pub fn document_element(&self) -> Option<NodeId> {
        self.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&id| self.is_element(id))
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(PageError::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(PageError::NodeNotFound(id.0))
    }

    fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(PageError::NotAnElement(id.0)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(PageError::NotAnElement(id.0)),
        }
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Element(ElementData {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeKind::Text(text.into()))
    }

    /// Whether `id` refers to an element node
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0).map(|n| &n.kind), Some(NodeKind::Element(_)))
    }

    /// Whether `id` is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root() || self.ancestors(id).any(|a| a == self.root())
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Strict ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind_ok = !matches!(self.node(parent)?.kind, NodeKind::Text(_));
        if !parent_kind_ok {
            return Err(PageError::HierarchyRequest(format!(
                "text node {} cannot have children",
                parent.0
            )));
        }
        if matches!(self.node(child)?.kind, NodeKind::Document) {
            return Err(PageError::HierarchyRequest(
                "the document node cannot be appended".to_string(),
            ));
        }
        if let Some(current) = self.node(child)?.parent {
            return Err(PageError::HierarchyRequest(format!(
                "node {} is already attached to {}",
                child.0, current.0
            )));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(PageError::HierarchyRequest(format!(
                "node {} cannot be appended inside itself",
                child.0
            )));
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(PageError::HierarchyRequest(format!(
                "node {} is not a child of {}",
                child.0, parent.0
            )));
        }
        self.node_mut(parent)?.children.retain(|&c| c != child);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    /// Create the subtree described by `tree` and append it under `parent`
    pub fn insert_tree(&mut self, parent: NodeId, tree: &ElementNode) -> Result<NodeId> {
        // validate the parent before allocating anything
        self.node(parent)?;

        let id = self.build_detached(tree);
        self.append_child(parent, id)?;
        Ok(id)
    }

    fn build_detached(&mut self, tree: &ElementNode) -> NodeId {
        let top = self.build_element(tree);
        let mut stack: Vec<(NodeId, &ElementNode)> =
            tree.children.iter().rev().map(|child| (top, child)).collect();
        while let Some((parent, node)) = stack.pop() {
            let id = self.build_element(node);
            self.attach_unchecked(parent, id);
            stack.extend(node.children.iter().rev().map(|child| (id, child)));
        }
        top
    }

    /// Create one detached element with its attributes and text, no children
    fn build_element(&mut self, tree: &ElementNode) -> NodeId {
        let id = self.create_element(tree.tag_name.as_str());
        if let NodeKind::Element(data) = &mut self.nodes[id.0].kind {
            data.attributes = tree.attributes.clone();
        }
        if let Some(text) = &tree.text_content {
            let text_id = self.create_text(text.as_str());
            self.attach_unchecked(id, text_id);
        }
        id
    }

    fn attach_unchecked(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Result<&str> {
        Ok(self.element(id)?.tag_name.as_str())
    }

    /// Attribute value of an element
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .ok()
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    /// Whether an element carries an attribute at all
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute on an element
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.element_mut(id)?
            .attributes
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>> {
        Ok(self.element_mut(id)?.attributes.remove(name))
    }

    /// Whether an element's class list contains `class_name`
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        super::element::class_list(self.get_attribute(id, "class")).any(|c| c == class_name)
    }

    /// Whether an element matches `selector`
    pub fn matches(&self, id: NodeId, selector: &ClassSelector) -> bool {
        match self.element(id) {
            Ok(data) => selector.matches(
                &data.tag_name,
                data.attributes.get("class").map(String::as_str),
            ),
            Err(_) => false,
        }
    }

    /// Nearest inclusive ancestor of `id` matching `selector`
    pub fn closest(&self, id: NodeId, selector: &ClassSelector) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.matches(candidate, selector))
    }

    /// Nearest inclusive ancestor that is an element with the given tag
    pub fn closest_tag(&self, id: NodeId, tag_name: &str) -> Option<NodeId> {
        std::iter::once(id).chain(self.ancestors(id)).find(|&candidate| {
            self.tag_name(candidate)
                .map(|tag| tag.eq_ignore_ascii_case(tag_name))
                .unwrap_or(false)
        })
    }

    /// Strict descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(self.children(node).iter().rev().copied());
            Some(node)
        })
    }

    /// Connected elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &ClassSelector) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&node| self.matches(node, selector))
            .collect()
    }

    /// First connected element whose id attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&node| self.get_attribute(node, "id") == Some(id))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|node| match self.nodes.get(node.0).map(|n| &n.kind) {
                Some(NodeKind::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Count connected element nodes
    pub fn count_elements(&self) -> usize {
        self.descendants(self.root())
            .filter(|&node| self.is_element(node))
            .count()
    }

    /// Snapshot an element subtree back into an [`ElementNode`]
    ///
    /// Text children are joined into `text_content`.
    pub fn to_element_node(&self, id: NodeId) -> Result<ElementNode> {
        self.element(id)?;

        // children are finished before their parent when walking pre-order backwards
        let order: Vec<NodeId> = std::iter::once(id)
            .chain(self.descendants(id))
            .filter(|&node| self.is_element(node))
            .collect();
        let mut built: HashMap<NodeId, ElementNode> = HashMap::with_capacity(order.len());

        for &node in order.iter().rev() {
            let data = self.element(node)?;
            let mut element =
                ElementNode::new(data.tag_name.as_str()).with_attributes(data.attributes.clone());

            let mut text = String::new();
            for &child in self.children(node) {
                match &self.node(child)?.kind {
                    NodeKind::Text(t) => text.push_str(t),
                    NodeKind::Element(_) => {
                        let snapshot = built
                            .remove(&child)
                            .ok_or(PageError::NodeNotFound(child.0))?;
                        element.add_child(snapshot);
                    }
                    NodeKind::Document => {}
                }
            }
            if !text.is_empty() {
                element.text_content = Some(text);
            }
            built.insert(node, element);
        }

        built.remove(&id).ok_or(PageError::NodeNotFound(id.0))
    }

    /// Serialize the document element to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        let root = self
            .document_element()
            .ok_or_else(|| PageError::ElementNotFound("document element".to_string()))?;
        Ok(serde_json::to_string_pretty(&self.to_element_node(root)?)?)
    }
}
