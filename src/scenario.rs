//! Replay a scripted page session
//!
//! A scenario is a page fixture, a binder configuration and a list of tool
//! steps. Running it installs the binder on a fresh page, executes the steps
//! in order, and reports what each step did plus every window-open request
//! and default navigation the page produced.

use crate::binder::{BinderConfig, ClickToOpenBinder};
use crate::dom::ElementNode;
use crate::error::Result;
use crate::page::{Navigation, OpenRequest, Page, RecordingOpener, WindowOpener};
use crate::tools::{ToolContext, ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub tool: String,
    #[serde(default)]
    pub params: Value,
}

impl Step {
    pub fn new(tool: impl Into<String>, params: Value) -> Self {
        Self {
            tool: tool.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Top-level element of the page
    pub page: ElementNode,

    #[serde(default)]
    pub config: BinderConfig,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Result of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub tool: String,
    pub result: ToolResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepReport>,
    pub opened: Vec<OpenRequest>,
    pub navigations: Vec<Navigation>,
}

impl ScenarioReport {
    /// URLs passed to the opener, in order
    pub fn opened_urls(&self) -> Vec<&str> {
        self.opened.iter().map(|r| r.url.as_str()).collect()
    }

    /// Whether every step succeeded
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.result.success)
    }
}

impl Scenario {
    pub fn new(page: ElementNode) -> Self {
        Self {
            page,
            config: BinderConfig::default(),
            steps: Vec::new(),
        }
    }

    /// Builder method: set the binder configuration
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder method: append a step
    pub fn with_step(mut self, tool: impl Into<String>, params: Value) -> Self {
        self.steps.push(Step::new(tool, params));
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Run every step against a fresh page
    ///
    /// A failing step is recorded in the report and does not stop the run.
    pub fn run(&self) -> Result<ScenarioReport> {
        self.run_with_opener(Box::new(|_: OpenRequest| -> Result<()> { Ok(()) }))
    }

    /// Like [`Scenario::run`], but every open request is also handed to `opener`
    ///
    /// The report lists each request whether or not `opener` accepted it.
    pub fn run_with_opener(&self, mut opener: Box<dyn WindowOpener>) -> Result<ScenarioReport> {
        let recorder = RecordingOpener::new();
        let mut recorded = recorder.clone();
        let forward = move |request: OpenRequest| -> Result<()> {
            recorded.open(request.clone())?;
            opener.open(request)
        };
        let mut page = Page::from_element_tree(&self.page, Box::new(forward))?;
        ClickToOpenBinder::install_with(&mut page, self.config.clone())?;

        let registry = ToolRegistry::with_defaults();
        let mut steps = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let mut context = ToolContext::new(&mut page);
            let result = registry
                .execute(&step.tool, step.params.clone(), &mut context)
                .unwrap_or_else(|e| {
                    log::warn!("step '{}' failed: {}", step.tool, e);
                    ToolResult::failure(e.to_string())
                });
            steps.push(StepReport {
                tool: step.tool.clone(),
                result,
            });
        }

        Ok(ScenarioReport {
            steps,
            opened: recorder.take(),
            navigations: page.take_navigations(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::LoggingOpener;
    use serde_json::json;

    #[test]
    fn test_parse_minimal() {
        let scenario = Scenario::from_json_str(r#"{"page": {"tag_name": "body"}}"#).unwrap();

        assert!(scenario.steps.is_empty());
        assert_eq!(scenario.config, BinderConfig::default());
    }

    #[test]
    fn test_failed_step_does_not_stop_run() {
        let page = ElementNode::new("body").with_child(
            ElementNode::new("span")
                .with_id("tip")
                .with_class("tooltip clickable")
                .with_attribute("data-href", "https://example.com"),
        );
        let report = Scenario::new(page)
            .with_step("load", json!({}))
            .with_step("click", json!({"id": "missing"}))
            .with_step("click", json!({"id": "tip"}))
            .run()
            .unwrap();

        assert!(!report.all_succeeded());
        assert!(!report.steps[1].result.success);
        assert_eq!(report.opened_urls(), vec!["https://example.com"]);
    }

    #[test]
    fn test_report_serializes() {
        let report = Scenario::new(ElementNode::new("body"))
            .with_step("load", Value::Null)
            .run()
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["steps"][0]["tool"], "load");
        assert_eq!(json["opened"], json!([]));
    }

    #[test]
    fn test_run_with_opener_forwards_and_reports() {
        let page = ElementNode::new("body").with_child(
            ElementNode::new("span")
                .with_id("tip")
                .with_class("tooltip clickable")
                .with_attribute("data-href", "https://example.com"),
        );
        let scenario = Scenario::new(page)
            .with_step("load", json!({}))
            .with_step("click", json!({"id": "tip"}));

        let forwarded = RecordingOpener::new();
        let report = scenario.run_with_opener(Box::new(forwarded.clone())).unwrap();
        assert_eq!(forwarded.urls(), vec!["https://example.com"]);
        assert_eq!(report.opened_urls(), vec!["https://example.com"]);

        // a rejecting opener is logged by the binder, the click still succeeds
        let rejecting = |request: OpenRequest| -> Result<()> {
            Err(crate::error::PageError::OpenFailed {
                url: request.url,
                reason: "blocked".to_string(),
            })
        };
        let report = scenario.run_with_opener(Box::new(rejecting)).unwrap();
        assert!(report.all_succeeded());
        assert_eq!(report.opened_urls(), vec!["https://example.com"]);
    }

    #[test]
    fn test_run_with_logging_opener() {
        let _ = env_logger::builder().is_test(true).try_init();
        let page = ElementNode::new("body").with_child(
            ElementNode::new("span")
                .with_id("tip")
                .with_class("tooltip clickable")
                .with_attribute("data-href", "https://example.com"),
        );

        let report = Scenario::new(page)
            .with_step("load", json!({}))
            .with_step("click", json!({"id": "tip"}))
            .run_with_opener(Box::new(LoggingOpener))
            .unwrap();

        assert!(report.all_succeeded());
        assert_eq!(report.opened_urls(), vec!["https://example.com"]);
    }
}
