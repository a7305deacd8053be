use crate::dom::ClassSelector;
use crate::error::{PageError, Result};
use serde::{Deserialize, Serialize};

/// How the binder attaches its click handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingStrategy {
    /// One listener on the document that inspects every click.
    /// Covers elements inserted after initialization.
    #[default]
    Delegated,
    /// One listener per element matched at initialization time.
    /// Elements inserted later are not covered.
    PerElement,
}

/// Configuration for [`crate::ClickToOpenBinder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Selector a clicked element (or an ancestor) must match
    pub selector: ClassSelector,

    /// Attribute holding the destination URL
    pub href_attribute: String,

    /// Browsing context name passed to the opener
    pub target: String,

    /// Binding strategy
    pub strategy: BindingStrategy,

    /// Log the clicked element and its href at debug level
    pub debug: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            selector: ClassSelector::tooltip_clickable(),
            href_attribute: "data-href".to_string(),
            target: "_blank".to_string(),
            strategy: BindingStrategy::Delegated,
            debug: false,
        }
    }
}

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PageError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the binder cannot act on
    pub fn validate(&self) -> Result<()> {
        if self.href_attribute.trim().is_empty() {
            return Err(PageError::InvalidConfig(
                "href_attribute must not be empty".to_string(),
            ));
        }
        if self.target.trim().is_empty() {
            return Err(PageError::InvalidConfig(
                "target must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder method: set the qualifying selector
    pub fn selector(mut self, selector: ClassSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Builder method: set the URL attribute
    pub fn href_attribute(mut self, name: impl Into<String>) -> Self {
        self.href_attribute = name.into();
        self
    }

    /// Builder method: set the browsing context name
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Builder method: set the binding strategy
    pub fn strategy(mut self, strategy: BindingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder method: enable debug logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
