use thiserror::Error;

/// Errors raised by the page environment and the replay harness.
///
/// Click handling itself never produces one of these; a qualifying element
/// without a usable `data-href` is a silent no-op.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    #[error("Node {0} is not an element")]
    NotAnElement(usize),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Hierarchy request failed: {0}")]
    HierarchyRequest(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Invalid page state: {0}")]
    InvalidState(String),

    #[error("Failed to open '{url}': {reason}")]
    OpenFailed { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PageError>;
