#![forbid(unsafe_code)]

//! Surface and platform implementations that render nowhere.
//!
//! [`HeadlessSurface`] records every build, teardown and present call and
//! can be told to fail specific steps, which makes the window state machine
//! testable. [`RecordingPlatform`] records what the window asked of the OS.

use std::collections::VecDeque;

use trellis_core::cursor::Cursor;
use trellis_core::geometry::Extent;
use trellis_widgets::DrawBuffers;

use crate::surface::{Platform, Surface, SurfaceError};

/// A step of the surface lifecycle, as recorded by [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    BuildDevice,
    BuildSurface,
    BuildSwapchain,
    TeardownSwapchain,
    TeardownSurface,
    TeardownDevice,
    Present,
}

/// Vertex counts of one presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentedFrame {
    pub flat: usize,
    pub boxes: usize,
    pub images: usize,
    pub sdf: usize,
}

impl PresentedFrame {
    #[must_use]
    pub fn total(&self) -> usize {
        self.flat + self.boxes + self.images + self.sdf
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    calls: Vec<SurfaceCall>,
    frames: Vec<PresentedFrame>,
    failures: VecDeque<(SurfaceCall, SurfaceError)>,
    swapchain_extent: Option<Extent>,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `call` fail with `error`. Failures queue up in order.
    pub fn fail_next(&mut self, call: SurfaceCall, error: SurfaceError) -> &mut Self {
        self.failures.push_back((call, error));
        self
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn frames(&self) -> &[PresentedFrame] {
        &self.frames
    }

    /// Extent of the current swapchain, if one is built.
    pub fn swapchain_extent(&self) -> Option<Extent> {
        self.swapchain_extent
    }

    fn record(&mut self, call: SurfaceCall) -> Result<(), SurfaceError> {
        self.calls.push(call);
        match self.failures.front() {
            Some((failing, _)) if *failing == call => match self.failures.pop_front() {
                Some((_, error)) => Err(error),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl Surface for HeadlessSurface {
    fn build_device(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::BuildDevice)
    }

    fn build_surface(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::BuildSurface)
    }

    fn build_swapchain(&mut self, extent: Extent) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::BuildSwapchain)?;
        self.swapchain_extent = Some(extent);
        Ok(())
    }

    fn teardown_swapchain(&mut self) {
        self.calls.push(SurfaceCall::TeardownSwapchain);
        self.swapchain_extent = None;
    }

    fn teardown_surface(&mut self) {
        self.calls.push(SurfaceCall::TeardownSurface);
    }

    fn teardown_device(&mut self) {
        self.calls.push(SurfaceCall::TeardownDevice);
    }

    fn present(&mut self, buffers: &DrawBuffers) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Present)?;
        self.frames.push(PresentedFrame {
            flat: buffers.flat.len(),
            boxes: buffers.boxes.len(),
            images: buffers.images.len(),
            sdf: buffers.sdf.len(),
        });
        Ok(())
    }
}

/// Records platform requests instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    pub cursors: Vec<Cursor>,
    pub size_requests: Vec<Extent>,
    pub closed: bool,
    pub minimized: usize,
    pub maximized: usize,
}

impl RecordingPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for RecordingPlatform {
    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
    }

    fn set_window_size(&mut self, extent: Extent) {
        self.size_requests.push(extent);
    }

    fn close_window(&mut self) {
        self.closed = true;
    }

    fn minimize_window(&mut self) {
        self.minimized += 1;
    }

    fn maximize_window(&mut self) {
        self.maximized += 1;
    }
}
