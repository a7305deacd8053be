use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serializable element tree used for page fixtures and document snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "span", "a")
    pub tag_name: String,

    /// Element attributes (e.g., id, class, data-href)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set the id attribute
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }

    /// Builder method: set the class attribute
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attribute("class", class)
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: append one child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        class_list(self.attributes.get("class").map(String::as_str)).any(|c| c == class_name)
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Count this element and all of its descendants
    pub fn count_elements(&self) -> usize {
        1 + self.children.iter().map(ElementNode::count_elements).sum::<usize>()
    }

    /// Short opening-tag rendering used in diagnostics
    pub fn to_simple_string(&self) -> String {
        let mut parts = vec![format!("<{}", self.tag_name)];

        if let Some(id) = self.id() {
            parts.push(format!(" id=\"{}\"", id));
        }

        if let Some(class) = self.attributes.get("class") {
            parts.push(format!(" class=\"{}\"", class));
        }

        if let Some(href) = self.attributes.get("data-href") {
            parts.push(format!(" data-href=\"{}\"", href));
        }

        parts.push(">".to_string());

        if let Some(text) = &self.text_content {
            if !text.trim().is_empty() {
                parts.push(text.trim().to_string());
            }
        }

        parts.join("")
    }
}

/// Split a class attribute value into its tokens
pub(crate) fn class_list(value: Option<&str>) -> impl Iterator<Item = &str> {
    value.unwrap_or_default().split_ascii_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_creation() {
        let element = ElementNode::new("span")
            .with_id("tip-1")
            .with_class("tooltip clickable")
            .with_attribute("data-href", "https://example.com")
            .with_text("hover me");

        assert_eq!(element.tag_name, "span");
        assert_eq!(element.id(), Some(&"tip-1".to_string()));
        assert_eq!(
            element.get_attribute("data-href"),
            Some(&"https://example.com".to_string())
        );
        assert_eq!(element.text_content, Some("hover me".to_string()));
    }

    #[test]
    fn test_has_class() {
        let mut element = ElementNode::new("div");
        element.add_attribute("class", "  tooltip\tclickable  wide ");

        assert!(element.has_class("tooltip"));
        assert!(element.has_class("clickable"));
        assert!(element.has_class("wide"));
        assert!(!element.has_class("tool"));
        assert!(!ElementNode::new("div").has_class("tooltip"));
    }

    #[test]
    fn test_count_elements() {
        let tree = ElementNode::new("body")
            .with_child(ElementNode::new("p").with_child(ElementNode::new("span")))
            .with_child(ElementNode::new("a"));

        assert_eq!(tree.count_elements(), 4);
    }

    #[test]
    fn test_deserialize_fixture_defaults() {
        let element: ElementNode = serde_json::from_value(serde_json::json!({
            "tag_name": "span",
            "attributes": { "class": "tooltip clickable" }
        }))
        .unwrap();

        assert!(element.children.is_empty());
        assert!(element.text_content.is_none());
        assert!(element.has_class("clickable"));
    }

    #[test]
    fn test_to_simple_string() {
        let element = ElementNode::new("span")
            .with_id("tip")
            .with_class("tooltip clickable")
            .with_attribute("data-href", "/docs")
            .with_text("  Docs ");

        let simple = element.to_simple_string();
        assert!(simple.starts_with("<span"));
        assert!(simple.contains("id=\"tip\""));
        assert!(simple.contains("class=\"tooltip clickable\""));
        assert!(simple.contains("data-href=\"/docs\""));
        assert!(simple.ends_with(">Docs"));
    }
}
