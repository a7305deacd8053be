use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Request to open a new browsing context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    /// Destination URL, exactly as read from the page
    pub url: String,

    /// Browsing context name (`_blank` for a new, unnamed context)
    pub target: String,

    /// The new context gets no reference back to the opening page
    pub noopener: bool,
}

impl OpenRequest {
    /// Request for a new tab without an opener reference
    pub fn new_tab(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: "_blank".to_string(),
            noopener: true,
        }
    }

    /// Feature string as passed to `window.open`
    pub fn features(&self) -> &'static str {
        if self.noopener { "noopener" } else { "" }
    }
}

/// The page environment's window-opening capability
pub trait WindowOpener {
    fn open(&mut self, request: OpenRequest) -> Result<()>;
}

impl<F> WindowOpener for F
where
    F: FnMut(OpenRequest) -> Result<()>,
{
    fn open(&mut self, request: OpenRequest) -> Result<()> {
        self(request)
    }
}

/// Opener that records every request
///
/// Clones share one log, so a test can keep a handle after boxing one into a page.
#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    requests: Rc<RefCell<Vec<OpenRequest>>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded requests
    pub fn requests(&self) -> Vec<OpenRequest> {
        self.requests.borrow().clone()
    }

    /// Recorded URLs in call order
    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }

    /// Drain the recorded requests
    pub fn take(&self) -> Vec<OpenRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }
}

impl WindowOpener for RecordingOpener {
    fn open(&mut self, request: OpenRequest) -> Result<()> {
        self.requests.borrow_mut().push(request);
        Ok(())
    }
}

/// Opener that only reports requests through the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOpener;

impl WindowOpener for LoggingOpener {
    fn open(&mut self, request: OpenRequest) -> Result<()> {
        log::info!(
            "open {} in {} ({})",
            request.url,
            request.target,
            request.features()
        );
        Ok(())
    }
}
