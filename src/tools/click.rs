use crate::dom::{ClassSelector, NodeId};
use crate::error::{PageError, Result};
use crate::page::Page;
use crate::tools::{Tool, ToolContext, ToolResult};
use serde::{Deserialize, Serialize};

/// Parameters for the click tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickParams {
    /// Element id or selector plus position
    #[serde(flatten)]
    pub target: ElementTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementTarget {
    /// Select by id attribute
    Id {
        /// Element id
        id: String,
    },
    /// Select the nth match of a class selector
    Selector {
        /// Class selector such as `.tooltip.clickable`
        selector: String,
        /// Zero-based position among matches
        #[serde(default)]
        nth: usize,
    },
}

impl ElementTarget {
    /// Find the element this target names
    pub fn resolve(&self, page: &Page) -> Result<NodeId> {
        match self {
            Self::Id { id } => page.element_by_id(id),
            Self::Selector { selector, nth } => {
                let parsed: ClassSelector = selector.parse()?;
                page.document()
                    .query_selector_all(&parsed)
                    .get(*nth)
                    .copied()
                    .ok_or_else(|| PageError::ElementNotFound(format!("{} [{}]", selector, nth)))
            }
        }
    }
}

/// Tool for clicking elements
#[derive(Default)]
pub struct ClickTool;

impl Tool for ClickTool {
    type Params = ClickParams;

    fn name(&self) -> &str {
        "click"
    }

    fn execute_typed(&self, params: ClickParams, context: &mut ToolContext) -> Result<ToolResult> {
        let target = params.target.resolve(&*context.page)?;
        let navigations_before = context.page.navigations().len();
        let event = context.page.click(target)?;

        // listeners may drain the log mid-click
        let followed: Vec<&str> = context
            .page
            .navigations()
            .get(navigations_before..)
            .unwrap_or_default()
            .iter()
            .map(|n| n.href.as_str())
            .collect();

        Ok(ToolResult::success_with(serde_json::json!({
            "node": target.index(),
            "default_prevented": event.default_prevented,
            "propagation_stopped": event.propagation_stopped,
            "followed": followed,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::events::{Event, EventListener, EventType, ListenerOptions};
    use crate::page::RecordingOpener;
    use std::rc::Rc;

    fn page() -> Page {
        let root = ElementNode::new("body")
            .with_child(ElementNode::new("a").with_id("a1").with_attribute("href", "/one"))
            .with_child(ElementNode::new("span").with_class("tooltip clickable").with_id("t1"))
            .with_child(ElementNode::new("span").with_class("tooltip clickable").with_id("t2"));
        Page::from_element_tree(&root, Box::new(RecordingOpener::new())).unwrap()
    }

    #[test]
    fn test_click_params_id() {
        let params: ClickParams = serde_json::from_value(serde_json::json!({ "id": "t1" })).unwrap();
        match params.target {
            ElementTarget::Id { id } => assert_eq!(id, "t1"),
            _ => panic!("Expected id target"),
        }
    }

    #[test]
    fn test_click_params_selector() {
        let params: ClickParams =
            serde_json::from_value(serde_json::json!({ "selector": ".tooltip.clickable", "nth": 1 })).unwrap();
        match params.target {
            ElementTarget::Selector { selector, nth } => {
                assert_eq!(selector, ".tooltip.clickable");
                assert_eq!(nth, 1);
            }
            _ => panic!("Expected selector target"),
        }
    }

    #[test]
    fn test_resolve_selector_position() {
        let page = page();
        let target = ElementTarget::Selector {
            selector: ".tooltip.clickable".to_string(),
            nth: 1,
        };
        assert_eq!(target.resolve(&page).unwrap(), page.element_by_id("t2").unwrap());

        let missing = ElementTarget::Selector {
            selector: ".tooltip.clickable".to_string(),
            nth: 5,
        };
        assert!(matches!(missing.resolve(&page), Err(PageError::ElementNotFound(_))));
    }

    #[test]
    fn test_click_reports_followed_link() {
        let mut page = page();
        let mut context = ToolContext::new(&mut page);

        let result = ClickTool
            .execute_typed(
                ClickParams {
                    target: ElementTarget::Id { id: "a1".to_string() },
                },
                &mut context,
            )
            .unwrap();

        let data = result.data.unwrap();
        assert_eq!(data["default_prevented"], false);
        assert_eq!(data["followed"], serde_json::json!(["/one"]));
    }

    #[test]
    fn test_click_survives_listener_draining_navigations() {
        let mut page = page();
        let link = page.element_by_id("a1").unwrap();
        page.click(link).unwrap();
        page.click(link).unwrap();
        assert_eq!(page.navigations().len(), 2);

        let drain: Rc<dyn EventListener> = Rc::new(|_: &mut Event, page: &mut Page| {
            page.take_navigations();
        });
        page.add_event_listener(link, EventType::Click, drain, ListenerOptions::new())
            .unwrap();

        let mut context = ToolContext::new(&mut page);
        let result = ClickTool
            .execute_typed(
                ClickParams {
                    target: ElementTarget::Id { id: "a1".to_string() },
                },
                &mut context,
            )
            .unwrap();

        assert_eq!(result.data.unwrap()["followed"], serde_json::json!([]));
        assert_eq!(page.navigations().len(), 1);
    }
}
