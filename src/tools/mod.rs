//! Scripted page actions
//!
//! Each tool takes JSON parameters and acts on a [`Page`]. The registry is
//! what the scenario runner and the `tooltip-sim` binary drive.

pub mod click;
pub mod insert;
pub mod load;

pub use click::{ClickParams, ClickTool, ElementTarget};
pub use insert::{InsertParams, InsertTool};
pub use load::{LoadParams, LoadTool};

use crate::error::{PageError, Result};
use crate::page::Page;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Mutable access to the page a tool acts on
pub struct ToolContext<'a> {
    pub page: &'a mut Page,
}

impl<'a> ToolContext<'a> {
    pub fn new(page: &'a mut Page) -> Self {
        Self { page }
    }
}

/// A named page action with typed parameters
pub trait Tool {
    type Params: DeserializeOwned;

    fn name(&self) -> &str;

    fn execute_typed(&self, params: Self::Params, context: &mut ToolContext) -> Result<ToolResult>;

    /// Deserialize `params` and run; `null` is treated as an empty object
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        let typed = serde_json::from_value(params).map_err(|e| PageError::ToolExecutionFailed {
            tool: self.name().to_string(),
            reason: format!("invalid parameters: {}", e),
        })?;
        self.execute_typed(typed, context)
    }
}

trait DynTool {
    fn name(&self) -> &str;
    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult>;
}

impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn execute(&self, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        Tool::execute(self, params, context)
    }
}

/// Tools by name, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `load`, `click` and `insert`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LoadTool);
        registry.register(ClickTool);
        registry.register(InsertTool);
        registry
    }

    /// Add a tool, replacing any tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(Tool::name(&tool).to_string(), Box::new(tool));
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Run a tool by name
    pub fn execute(&self, name: &str, params: Value, context: &mut ToolContext) -> Result<ToolResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| PageError::UnknownTool(name.to_string()))?;
        log::debug!("tool {} with {}", tool.name(), params);
        tool.execute(params, context)
    }
}
