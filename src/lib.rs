//! # tooltip-links
//!
//! Click-to-open behaviour for tooltip links, over an injectable page environment.
//!
//! Elements carrying both the `tooltip` and `clickable` classes open the URL
//! in their `data-href` attribute in a new browsing context when clicked.
//! Instead of reaching for a global document and window, the binder is given
//! a [`Page`]: an in-memory DOM with event dispatch and a pluggable
//! [`WindowOpener`].
//!
//! ## Usage
//!
//! ```rust
//! use tooltip_links::{ClickToOpenBinder, ElementNode, Page, RecordingOpener};
//!
//! # fn main() -> tooltip_links::Result<()> {
//! let opener = RecordingOpener::new();
//! let body = ElementNode::new("body").with_child(
//!     ElementNode::new("span")
//!         .with_id("tip")
//!         .with_class("tooltip clickable")
//!         .with_attribute("data-href", "https://example.com"),
//! );
//! let mut page = Page::from_element_tree(&body, Box::new(opener.clone()))?;
//!
//! // binding happens when DOMContentLoaded fires
//! ClickToOpenBinder::install(&mut page)?;
//! page.finish_parsing()?;
//!
//! page.click_by_id("tip")?;
//! assert_eq!(opener.urls(), vec!["https://example.com"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Binding strategies
//!
//! The default [`BindingStrategy::Delegated`] listens once at the document
//! and also covers elements inserted after load.
//! [`BindingStrategy::PerElement`] only covers elements present when the
//! document finished parsing.
//!
//! ## Module Overview
//!
//! - [`binder`]: the click-to-open binder and its configuration
//! - [`dom`]: element fixtures, class selectors and the arena document
//! - [`events`]: events, phases and listener registration
//! - [`page`]: the page environment and window openers
//! - [`tools`]: scripted page actions (`load`, `click`, `insert`)
//! - [`scenario`]: replaying a scripted session and reporting what it opened
//! - [`error`]: error types and result alias

pub mod binder;
pub mod dom;
pub mod error;
pub mod events;
pub mod page;
pub mod scenario;
pub mod tools;

pub use binder::{BinderConfig, BindingStrategy, ClickToOpenBinder};
pub use dom::{ClassSelector, Document, ElementNode, NodeId};
pub use error::{PageError, Result};
pub use events::{Event, EventListener, EventType, ListenerOptions};
pub use page::{LoggingOpener, Navigation, OpenRequest, Page, ReadyState, RecordingOpener, WindowOpener};
pub use scenario::{Scenario, ScenarioReport};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};
