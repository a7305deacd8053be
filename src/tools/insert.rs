use crate::dom::ElementNode;
use crate::error::{PageError, Result};
use crate::tools::{Tool, ToolContext, ToolResult};
use serde::{Deserialize, Serialize};

/// Parameters for the insert tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertParams {
    /// Id of the parent element; the document element when omitted
    #[serde(default)]
    pub parent: Option<String>,

    /// Subtree to append
    pub element: ElementNode,
}

/// Append an element subtree to the live document
#[derive(Default)]
pub struct InsertTool;

impl Tool for InsertTool {
    type Params = InsertParams;

    fn name(&self) -> &str {
        "insert"
    }

    fn execute_typed(&self, params: InsertParams, context: &mut ToolContext) -> Result<ToolResult> {
        let parent = match &params.parent {
            Some(id) => context.page.element_by_id(id)?,
            None => context
                .page
                .document()
                .document_element()
                .ok_or_else(|| PageError::ElementNotFound("document element".to_string()))?,
        };

        let node = context.page.document_mut().insert_tree(parent, &params.element)?;

        Ok(ToolResult::success_with(serde_json::json!({
            "node": node.index(),
            "parent": parent.index(),
            "element": params.element.to_simple_string(),
        })))
    }
}
