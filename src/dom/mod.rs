//! In-memory DOM for the page environment
//!
//! This module provides the document the binder observes. It includes:
//! - ElementNode: serializable element trees used as page fixtures
//! - Document: arena-backed tree with ancestor walks and class queries
//! - ClassSelector: compound `.a.b` selectors used to recognise elements

pub mod element;
pub mod selector;
pub mod tree;

pub use element::ElementNode;
pub use selector::ClassSelector;
pub use tree::{Document, NodeId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("span");
        assert_eq!(element.tag_name, "span");
    }

    #[test]
    fn test_class_selector_export() {
        let selector: ClassSelector = ".tooltip.clickable".parse().unwrap();
        assert_eq!(selector.classes().len(), 2);
    }

    #[test]
    fn test_document_export() {
        let doc = Document::from_element_tree(&ElementNode::new("body")).unwrap();
        assert_eq!(doc.count_elements(), 1);
    }
}
