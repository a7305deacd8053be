use crate::dom::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event types the page environment dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// The document's structure has been parsed
    #[serde(rename = "DOMContentLoaded")]
    DomContentLoaded,
    /// Pointer activation
    #[serde(rename = "click")]
    Click,
}

impl EventType {
    /// Name as it appears in `addEventListener`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Click => "click",
        }
    }

    /// Whether events of this type bubble
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click)
    }

    /// Whether events of this type can have their default action prevented
    pub fn cancelable(self) -> bool {
        matches!(self, Self::Click)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch phase an event is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// State of one event travelling through the document
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: NodeId,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub immediate_propagation_stopped: bool,
}

impl Event {
    /// New event aimed at `target`, with bubbling and cancelability from its type
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            phase: EventPhase::None,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Cancel the default action; ignored for non-cancelable events
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop the event from reaching further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop the event from reaching any further listener, including ones on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_click_defaults() {
        let doc = Document::new();
        let event = Event::new(EventType::Click, doc.root());

        assert!(event.bubbles);
        assert!(event.cancelable);
        assert_eq!(event.phase, EventPhase::None);
        assert_eq!(event.current_target, event.target);
    }

    #[test]
    fn test_prevent_default_needs_cancelable() {
        let doc = Document::new();

        let mut loaded = Event::new(EventType::DomContentLoaded, doc.root());
        loaded.prevent_default();
        assert!(!loaded.default_prevented);

        let mut click = Event::new(EventType::Click, doc.root());
        click.prevent_default();
        assert!(click.default_prevented);
    }

    #[test]
    fn test_stop_immediate_implies_stop() {
        let doc = Document::new();
        let mut event = Event::new(EventType::Click, doc.root());
        event.stop_immediate_propagation();

        assert!(event.propagation_stopped);
        assert!(event.immediate_propagation_stopped);
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::Click.to_string(), "click");
        assert_eq!(
            serde_json::to_string(&EventType::DomContentLoaded).unwrap(),
            "\"DOMContentLoaded\""
        );
    }
}
