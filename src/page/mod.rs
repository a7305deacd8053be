//! Injectable page environment
//!
//! Stands in for the browser's document and window: a [`Page`] owns the DOM
//! and the listener registry, dispatches lifecycle and click events, and
//! forwards window-open requests to a [`WindowOpener`].

pub mod opener;
pub mod session;

pub use opener::{LoggingOpener, OpenRequest, RecordingOpener, WindowOpener};
pub use session::{Navigation, Page, ReadyState};
