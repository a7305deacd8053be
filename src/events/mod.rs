//! Events and listener bookkeeping
//!
//! Dispatch itself lives on [`crate::page::Page`], which owns both the
//! document and the registry.

pub mod event;
pub mod listeners;

pub use event::{Event, EventPhase, EventType};
pub use listeners::{EventListener, ListenerId, ListenerOptions, ListenerRegistry, MatchedListener};
