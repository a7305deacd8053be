use crate::dom::{Document, ElementNode, NodeId};
use crate::error::{PageError, Result};
use crate::events::{Event, EventListener, EventPhase, EventType, ListenerId, ListenerOptions, ListenerRegistry};
use crate::page::opener::{OpenRequest, WindowOpener};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Document lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadyState {
    /// Structure still being parsed
    Loading,
    /// `DOMContentLoaded` has fired
    Interactive,
}

/// A default-action navigation that was not cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The `href` of the followed link
    pub href: String,
    /// The link element that was followed
    pub link: NodeId,
}

/// Page environment: a document, its listeners, and the window capabilities
/// scripts would normally reach through globals
pub struct Page {
    document: Document,
    listeners: ListenerRegistry,
    ready_state: ReadyState,
    opener: Box<dyn WindowOpener>,
    navigations: Vec<Navigation>,
}

impl Page {
    /// Wrap an existing document; the page starts in [`ReadyState::Loading`]
    pub fn new(document: Document, opener: Box<dyn WindowOpener>) -> Self {
        Self {
            document,
            listeners: ListenerRegistry::new(),
            ready_state: ReadyState::Loading,
            opener,
            navigations: Vec::new(),
        }
    }

    /// Build a page from an element fixture
    pub fn from_element_tree(root: &ElementNode, opener: Box<dyn WindowOpener>) -> Result<Self> {
        Ok(Self::new(Document::from_element_tree(root)?, opener))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Look up an element by id or fail with [`PageError::ElementNotFound`]
    pub fn element_by_id(&self, id: &str) -> Result<NodeId> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| PageError::ElementNotFound(format!("#{}", id)))
    }

    /// Register a listener on the document node or an element
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        listener: Rc<dyn EventListener>,
        options: ListenerOptions,
    ) -> Result<ListenerId> {
        if node != self.document.root() && !self.document.is_element(node) {
            return Err(PageError::NodeNotFound(node.index()));
        }
        Ok(self.listeners.add(node, event_type, listener, options))
    }

    /// Remove a listener; returns false if it was not registered
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Mark the structure as parsed and fire `DOMContentLoaded` at the document
    pub fn finish_parsing(&mut self) -> Result<Event> {
        if self.ready_state != ReadyState::Loading {
            return Err(PageError::InvalidState(
                "DOMContentLoaded has already fired".to_string(),
            ));
        }
        self.ready_state = ReadyState::Interactive;
        log::debug!("document interactive, dispatching DOMContentLoaded");
        Ok(self.dispatch(Event::new(EventType::DomContentLoaded, self.document.root())))
    }

    /// Dispatch a trusted click at `target` and run its default action
    /// unless a listener prevented it
    pub fn click(&mut self, target: NodeId) -> Result<Event> {
        if !self.document.is_element(target) {
            return Err(PageError::NotAnElement(target.index()));
        }

        let event = self.dispatch(Event::new(EventType::Click, target));
        if !event.default_prevented {
            self.run_click_default(target);
        }
        Ok(event)
    }

    /// Click the element with the given id
    pub fn click_by_id(&mut self, id: &str) -> Result<Event> {
        let target = self.element_by_id(id)?;
        self.click(target)
    }

    // following the nearest enclosing link is the only default action modeled
    fn run_click_default(&mut self, target: NodeId) {
        let Some(link) = self.document.closest_tag(target, "a") else {
            return;
        };
        if let Some(href) = self.document.get_attribute(link, "href") {
            log::trace!("default action: follow {}", href);
            self.navigations.push(Navigation {
                href: href.to_string(),
                link,
            });
        }
    }

    /// Run an event through capture, target and bubble phases
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let target = event.target;
        let mut path: Vec<NodeId> = self.document.ancestors(target).collect();
        path.reverse();

        log::trace!(
            "dispatch {} at node {} through {} ancestors",
            event.event_type,
            target.index(),
            path.len()
        );

        'dispatch: {
            event.phase = EventPhase::Capturing;
            for &node in &path {
                self.invoke_listeners(node, &mut event, true);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }

            event.phase = EventPhase::AtTarget;
            self.invoke_listeners(target, &mut event, true);
            if event.propagation_stopped {
                break 'dispatch;
            }
            self.invoke_listeners(target, &mut event, false);
            if event.propagation_stopped || !event.bubbles {
                break 'dispatch;
            }

            event.phase = EventPhase::Bubbling;
            for &node in path.iter().rev() {
                self.invoke_listeners(node, &mut event, false);
                if event.propagation_stopped {
                    break 'dispatch;
                }
            }
        }

        event.phase = EventPhase::None;
        event.current_target = target;
        event
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event, capture: bool) {
        event.current_target = node;
        for matched in self.listeners.matching(node, event.event_type, capture) {
            // an earlier listener may have removed this one
            if !self.listeners.contains(matched.id) {
                continue;
            }
            if matched.once {
                self.listeners.remove(matched.id);
            }
            matched.listener.handle_event(event, self);
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }

    /// Ask the environment to open `url` in a new browsing context
    pub fn open_window(&mut self, request: OpenRequest) -> Result<()> {
        self.opener.open(request)
    }

    /// Navigations performed by uncancelled default actions
    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    /// Drain the navigation log
    pub fn take_navigations(&mut self) -> Vec<Navigation> {
        std::mem::take(&mut self.navigations)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("ready_state", &self.ready_state)
            .field("elements", &self.document.count_elements())
            .field("listeners", &self.listeners.len())
            .field("navigations", &self.navigations)
            .finish()
    }
}
