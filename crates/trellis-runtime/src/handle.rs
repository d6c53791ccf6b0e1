#![forbid(unsafe_code)]

//! Requests to a window from other threads.
//!
//! The widget tree is not `Send`; a [`WindowHandle`] is. Redraw requests go
//! straight to the window trigger. Anything that touches the tree is queued
//! and applied at the start of the next frame.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use trellis_core::time::TimePoint;
use trellis_core::trigger::{Trigger, level};
use trellis_widgets::WidgetTree;

pub(crate) type Job = Box<dyn FnOnce(&mut WidgetTree) + Send>;

pub(crate) enum Request {
    Relayout,
    Job(Job),
    Close,
}

/// The window was dropped before the request could be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGone;

impl fmt::Display for WindowGone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("window no longer exists")
    }
}

impl std::error::Error for WindowGone {}

/// A cloneable, thread-safe handle to a [`Window`](crate::Window).
#[derive(Clone)]
pub struct WindowHandle {
    sender: Sender<Request>,
    trigger: Arc<Trigger>,
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHandle")
            .field("pending", &self.trigger.peek())
            .finish_non_exhaustive()
    }
}

impl WindowHandle {
    pub(crate) fn new(sender: Sender<Request>, trigger: Arc<Trigger>) -> Self {
        Self { sender, trigger }
    }

    /// Repaint on the next frame.
    pub fn request_redraw(&self) {
        self.trigger.fire();
    }

    /// Repaint on the first frame at or after `at`.
    pub fn schedule_redraw(&self, at: TimePoint) {
        self.trigger.schedule(at);
    }

    /// Relayout every widget on the next frame.
    pub fn request_relayout(&self) -> Result<(), WindowGone> {
        self.send(Request::Relayout)?;
        self.trigger.raise(level::RELAYOUT);
        Ok(())
    }

    /// Run `job` on the window's thread before the next frame.
    pub fn run_on_frame(
        &self,
        job: impl FnOnce(&mut WidgetTree) + Send + 'static,
    ) -> Result<(), WindowGone> {
        self.send(Request::Job(Box::new(job)))?;
        self.trigger.raise(level::RELAYOUT);
        Ok(())
    }

    /// Ask the window to close.
    pub fn close(&self) -> Result<(), WindowGone> {
        self.send(Request::Close)?;
        self.trigger.fire();
        Ok(())
    }

    fn send(&self, request: Request) -> Result<(), WindowGone> {
        self.sender.send(request).map_err(|_| WindowGone)
    }
}
