use crate::dom::NodeId;
use crate::events::{Event, EventType};
use crate::page::Page;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Something that reacts to events dispatched on a page
///
/// Listeners receive the page mutably so they can read the document,
/// register further listeners, or ask the environment to open a window.
pub trait EventListener {
    fn handle_event(&self, event: &mut Event, page: &mut Page);
}

impl<F> EventListener for F
where
    F: Fn(&mut Event, &mut Page),
{
    fn handle_event(&self, event: &mut Event, page: &mut Page) {
        self(event, page)
    }
}

/// Identifies one registration, for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Options accepted by [`Page::add_event_listener`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase instead of the bubble phase
    pub capture: bool,
    /// Remove the registration before its first invocation
    pub once: bool,
}

impl ListenerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: capture phase
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Builder method: one-shot
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }
}

#[derive(Clone)]
struct Registration {
    node: NodeId,
    event_type: EventType,
    options: ListenerOptions,
    listener: Rc<dyn EventListener>,
}

/// A listener selected for one dispatch step
#[derive(Clone)]
pub struct MatchedListener {
    pub id: ListenerId,
    pub once: bool,
    pub listener: Rc<dyn EventListener>,
}

/// Registered listeners in registration order
/// Uses IndexMap so dispatch order follows insertion order
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    entries: IndexMap<ListenerId, Registration>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its id
    pub fn add(
        &mut self,
        node: NodeId,
        event_type: EventType,
        listener: Rc<dyn EventListener>,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Registration {
                node,
                event_type,
                options,
                listener,
            },
        );
        id
    }

    /// Remove a registration; returns false if it was already gone
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.entries.shift_remove(&id).is_some()
    }

    /// Check if a registration is still present
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Listeners on `node` for `event_type` in the given phase, in registration order
    pub fn matching(&self, node: NodeId, event_type: EventType, capture: bool) -> Vec<MatchedListener> {
        self.entries
            .iter()
            .filter(|(_, reg)| {
                reg.node == node && reg.event_type == event_type && reg.options.capture == capture
            })
            .map(|(&id, reg)| MatchedListener {
                id,
                once: reg.options.once,
                listener: Rc::clone(&reg.listener),
            })
            .collect()
    }

    /// Number of registrations on `node` for `event_type`, both phases
    pub fn count_for(&self, node: NodeId, event_type: EventType) -> usize {
        self.entries
            .values()
            .filter(|reg| reg.node == node && reg.event_type == event_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(id, reg)| (id, (reg.node, reg.event_type, reg.options))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn noop() -> Rc<dyn EventListener> {
        Rc::new(|_: &mut Event, _: &mut Page| {})
    }

    #[test]
    fn test_add_and_match_in_order() {
        let doc = Document::new();
        let root = doc.root();
        let mut registry = ListenerRegistry::new();

        let first = registry.add(root, EventType::Click, noop(), ListenerOptions::new());
        let _capture = registry.add(root, EventType::Click, noop(), ListenerOptions::new().capture(true));
        let second = registry.add(root, EventType::Click, noop(), ListenerOptions::new().once(true));
        let _other = registry.add(root, EventType::DomContentLoaded, noop(), ListenerOptions::new());

        let bubble: Vec<_> = registry.matching(root, EventType::Click, false);
        assert_eq!(bubble.iter().map(|m| m.id).collect::<Vec<_>>(), vec![first, second]);
        assert!(!bubble[0].once);
        assert!(bubble[1].once);

        assert_eq!(registry.matching(root, EventType::Click, true).len(), 1);
        assert_eq!(registry.count_for(root, EventType::Click), 3);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_remove() {
        let doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let id = registry.add(doc.root(), EventType::Click, noop(), ListenerOptions::new());

        assert!(registry.contains(id));
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let doc = Document::new();
        let mut registry = ListenerRegistry::new();
        let a = registry.add(doc.root(), EventType::Click, noop(), ListenerOptions::new());
        registry.remove(a);
        let b = registry.add(doc.root(), EventType::Click, noop(), ListenerOptions::new());

        assert_ne!(a, b);
    }
}
