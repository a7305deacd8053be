//! Click-to-open binding for tooltip links
//!
//! [`ClickToOpenBinder`] waits for `DOMContentLoaded`, then makes clicks on
//! elements matching `.tooltip.clickable` open their `data-href` in a new
//! browsing context.
//!
//! The default [`BindingStrategy::Delegated`] registers a single listener on
//! the document and resolves the nearest qualifying ancestor of each click
//! target, so content inserted after load is covered and the click's default
//! action and propagation are suppressed. [`BindingStrategy::PerElement`]
//! attaches to the elements present at initialization only and leaves the
//! default action alone.

pub mod config;
pub mod href;

pub use config::{BinderConfig, BindingStrategy};
pub use href::usable_href;

use crate::dom::NodeId;
use crate::error::Result;
use crate::events::{Event, EventListener, EventType, ListenerId, ListenerOptions};
use crate::page::{OpenRequest, Page, ReadyState};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct BinderState {
    initialized: bool,
    init_listener: Option<ListenerId>,
    click_listeners: Vec<ListenerId>,
}

/// Handle to a binder installed on a [`Page`]
///
/// Dropping the handle does not unbind; the page owns the listeners and
/// its lifetime bounds them. Use [`ClickToOpenBinder::uninstall`] to detach
/// explicitly.
#[derive(Debug, Clone)]
pub struct ClickToOpenBinder {
    config: Rc<BinderConfig>,
    state: Rc<RefCell<BinderState>>,
}

impl ClickToOpenBinder {
    /// Install with the default configuration
    pub fn install(page: &mut Page) -> Result<Self> {
        Self::install_with(page, BinderConfig::default())
    }

    /// Install on `page`, binding when `DOMContentLoaded` fires, or right
    /// away if it already has
    pub fn install_with(page: &mut Page, config: BinderConfig) -> Result<Self> {
        config.validate()?;
        let binder = Self {
            config: Rc::new(config),
            state: Rc::new(RefCell::new(BinderState::default())),
        };

        match page.ready_state() {
            ReadyState::Loading => {
                let root = page.document().root();
                let id = page.add_event_listener(
                    root,
                    EventType::DomContentLoaded,
                    Rc::new(InitOnContentLoaded {
                        binder: binder.clone(),
                    }),
                    ListenerOptions::new().once(true),
                )?;
                binder.state.borrow_mut().init_listener = Some(id);
            }
            ReadyState::Interactive => binder.bind(page),
        }

        Ok(binder)
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Whether initialization has run
    pub fn is_bound(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Number of click listeners this binder registered
    pub fn click_listener_count(&self) -> usize {
        self.state.borrow().click_listeners.len()
    }

    /// Remove every listener this binder registered
    pub fn uninstall(&self, page: &mut Page) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.init_listener.take() {
            page.remove_event_listener(id);
        }
        for id in state.click_listeners.drain(..) {
            page.remove_event_listener(id);
        }
    }

    fn bind(&self, page: &mut Page) {
        if self.state.borrow().initialized {
            return;
        }

        let registrations: Vec<(NodeId, Rc<dyn EventListener>)> = match self.config.strategy {
            BindingStrategy::Delegated => {
                let listener: Rc<dyn EventListener> = Rc::new(DelegatedClick {
                    config: Rc::clone(&self.config),
                });
                vec![(page.document().root(), listener)]
            }
            BindingStrategy::PerElement => {
                let listener: Rc<dyn EventListener> = Rc::new(ElementClick {
                    config: Rc::clone(&self.config),
                });
                page.document()
                    .query_selector_all(&self.config.selector)
                    .into_iter()
                    .map(|node| (node, Rc::clone(&listener)))
                    .collect()
            }
        };

        let mut ids = Vec::with_capacity(registrations.len());
        for (node, listener) in registrations {
            match page.add_event_listener(node, EventType::Click, listener, ListenerOptions::new()) {
                Ok(id) => ids.push(id),
                Err(e) => log::warn!("failed to bind click listener on node {}: {}", node.index(), e),
            }
        }

        log::debug!(
            "bound {} click listener(s) for {} ({:?})",
            ids.len(),
            self.config.selector,
            self.config.strategy
        );

        let mut state = self.state.borrow_mut();
        state.initialized = true;
        state.init_listener = None;
        state.click_listeners = ids;
    }
}

struct InitOnContentLoaded {
    binder: ClickToOpenBinder,
}

impl EventListener for InitOnContentLoaded {
    fn handle_event(&self, _event: &mut Event, page: &mut Page) {
        self.binder.bind(page);
    }
}

/// Document-level listener that resolves the qualifying element per click
struct DelegatedClick {
    config: Rc<BinderConfig>,
}

impl EventListener for DelegatedClick {
    fn handle_event(&self, event: &mut Event, page: &mut Page) {
        let Some(element) = page.document().closest(event.target, &self.config.selector) else {
            return;
        };

        event.prevent_default();
        event.stop_propagation();
        open_element_href(&self.config, element, page);
    }
}

/// Listener attached directly to one qualifying element
struct ElementClick {
    config: Rc<BinderConfig>,
}

impl EventListener for ElementClick {
    fn handle_event(&self, event: &mut Event, page: &mut Page) {
        open_element_href(&self.config, event.current_target, page);
    }
}

fn open_element_href(config: &BinderConfig, element: NodeId, page: &mut Page) {
    let raw = page
        .document()
        .get_attribute(element, &config.href_attribute)
        .map(str::to_owned);

    if config.debug {
        let description = page
            .document()
            .to_element_node(element)
            .map(|node| node.to_simple_string())
            .unwrap_or_else(|_| format!("node {}", element.index()));
        log::debug!("Clicked element: {}", description);
        log::debug!("Href: {:?}", raw);
    }

    let Some(url) = usable_href(raw.as_deref()) else {
        return;
    };

    let request = OpenRequest {
        url: url.to_string(),
        target: config.target.clone(),
        noopener: true,
    };
    if let Err(e) = page.open_window(request) {
        log::warn!("window open rejected: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::error::PageError;
    use crate::page::RecordingOpener;

    fn page_with(opener: &RecordingOpener) -> Page {
        let root = ElementNode::new("body")
            .with_child(
                ElementNode::new("span")
                    .with_id("tip")
                    .with_class("tooltip clickable")
                    .with_attribute("data-href", "https://example.com"),
            )
            .with_child(
                ElementNode::new("span")
                    .with_id("empty")
                    .with_class("tooltip clickable")
                    .with_attribute("data-href", ""),
            );
        Page::from_element_tree(&root, Box::new(opener.clone())).unwrap()
    }

    #[test]
    fn test_binds_on_content_loaded() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        let binder = ClickToOpenBinder::install(&mut page).unwrap();

        assert!(!binder.is_bound());
        page.click_by_id("tip").unwrap();
        assert!(opener.is_empty());

        page.finish_parsing().unwrap();
        assert!(binder.is_bound());
        assert_eq!(binder.click_listener_count(), 1);

        page.click_by_id("tip").unwrap();
        assert_eq!(opener.requests(), vec![OpenRequest::new_tab("https://example.com")]);
    }

    #[test]
    fn test_installs_immediately_after_load() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        page.finish_parsing().unwrap();

        let binder = ClickToOpenBinder::install(&mut page).unwrap();
        assert!(binder.is_bound());

        page.click_by_id("tip").unwrap();
        assert_eq!(opener.len(), 1);
    }

    #[test]
    fn test_empty_href_is_suppressed_noop() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        ClickToOpenBinder::install(&mut page).unwrap();
        page.finish_parsing().unwrap();

        let event = page.click_by_id("empty").unwrap();
        assert!(event.default_prevented);
        assert!(event.propagation_stopped);
        assert!(opener.is_empty());
    }

    #[test]
    fn test_per_element_binds_each_match() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        let config = BinderConfig::new().strategy(BindingStrategy::PerElement);
        let binder = ClickToOpenBinder::install_with(&mut page, config).unwrap();
        page.finish_parsing().unwrap();

        assert_eq!(binder.click_listener_count(), 2);

        let event = page.click_by_id("tip").unwrap();
        assert!(!event.default_prevented);
        assert_eq!(opener.urls(), vec!["https://example.com"]);
    }

    #[test]
    fn test_custom_attribute_and_target() {
        let opener = RecordingOpener::new();
        let root = ElementNode::new("body").with_child(
            ElementNode::new("span")
                .with_id("tip")
                .with_class("tip")
                .with_attribute("data-url", "/guide"),
        );
        let mut page = Page::from_element_tree(&root, Box::new(opener.clone())).unwrap();
        let config = BinderConfig::new()
            .selector(".tip".parse().unwrap())
            .href_attribute("data-url")
            .target("docs");
        ClickToOpenBinder::install_with(&mut page, config).unwrap();
        page.finish_parsing().unwrap();

        page.click_by_id("tip").unwrap();
        let requests = opener.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "/guide");
        assert_eq!(requests[0].target, "docs");
        assert!(requests[0].noopener);
    }

    #[test]
    fn test_rejected_open_is_swallowed() {
        let rejected = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&rejected);
        let opener = move |request: OpenRequest| -> Result<()> {
            *counter.borrow_mut() += 1;
            Err(PageError::OpenFailed {
                url: request.url,
                reason: "popup blocked".to_string(),
            })
        };
        let root = ElementNode::new("body").with_child(
            ElementNode::new("span")
                .with_id("tip")
                .with_class("tooltip clickable")
                .with_attribute("data-href", "https://example.com"),
        );
        let mut page = Page::from_element_tree(&root, Box::new(opener)).unwrap();
        ClickToOpenBinder::install(&mut page).unwrap();
        page.finish_parsing().unwrap();

        let event = page.click_by_id("tip").unwrap();
        assert!(event.default_prevented);
        assert_eq!(*rejected.borrow(), 1);
    }

    #[test]
    fn test_uninstall_detaches() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        let binder = ClickToOpenBinder::install(&mut page).unwrap();
        page.finish_parsing().unwrap();

        binder.uninstall(&mut page);
        assert!(page.listeners().is_empty());

        page.click_by_id("tip").unwrap();
        assert!(opener.is_empty());
    }

    #[test]
    fn test_uninstall_before_load_cancels_init() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);
        let binder = ClickToOpenBinder::install(&mut page).unwrap();

        binder.uninstall(&mut page);
        page.finish_parsing().unwrap();

        assert!(!binder.is_bound());
        assert!(page.listeners().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let opener = RecordingOpener::new();
        let mut page = page_with(&opener);

        let result = ClickToOpenBinder::install_with(&mut page, BinderConfig::new().target(""));
        assert!(matches!(result, Err(PageError::InvalidConfig(_))));
        assert!(page.listeners().is_empty());
    }
}
