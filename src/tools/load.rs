use crate::error::Result;
use crate::tools::{Tool, ToolContext, ToolResult};
use serde::{Deserialize, Serialize};

/// Parameters for the load tool (none)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadParams {}

/// Finish parsing the page, firing `DOMContentLoaded`
#[derive(Default)]
pub struct LoadTool;

impl Tool for LoadTool {
    type Params = LoadParams;

    fn name(&self) -> &str {
        "load"
    }

    fn execute_typed(&self, _params: LoadParams, context: &mut ToolContext) -> Result<ToolResult> {
        context.page.finish_parsing()?;

        Ok(ToolResult::success_with(serde_json::json!({
            "ready_state": context.page.ready_state(),
            "listeners": context.page.listeners().len(),
        })))
    }
}
