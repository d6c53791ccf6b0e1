#![forbid(unsafe_code)]

//! Interfaces to the GPU and the OS window.

use std::fmt;

use trellis_core::cursor::Cursor;
use trellis_core::geometry::Extent;
use trellis_widgets::DrawBuffers;

use crate::state::WindowState;

/// Failures reported by a [`Surface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The swapchain must be recreated, typically after a resize.
    SwapchainOutOfDate,
    SurfaceLost,
    DeviceLost,
    /// Not ready this frame; try again next frame without rebuilding.
    NotReady,
    Other(String),
}

impl SurfaceError {
    /// The lost state a failed present leaves the window in, or `None` if
    /// the frame is just skipped.
    #[must_use]
    pub fn lost_state(&self) -> Option<WindowState> {
        match self {
            Self::SwapchainOutOfDate => Some(WindowState::SwapchainLost),
            Self::SurfaceLost => Some(WindowState::SurfaceLost),
            Self::DeviceLost | Self::Other(_) => Some(WindowState::DeviceLost),
            Self::NotReady => None,
        }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwapchainOutOfDate => write!(f, "swapchain out of date"),
            Self::SurfaceLost => write!(f, "surface lost"),
            Self::DeviceLost => write!(f, "device lost"),
            Self::NotReady => write!(f, "surface not ready"),
            Self::Other(reason) => write!(f, "surface error: {reason}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// GPU resources of one window.
///
/// Build steps are called in order device, surface, swapchain; teardown in
/// reverse. Teardown of something never built must be harmless.
pub trait Surface {
    fn build_device(&mut self) -> Result<(), SurfaceError>;
    fn build_surface(&mut self) -> Result<(), SurfaceError>;
    fn build_swapchain(&mut self, extent: Extent) -> Result<(), SurfaceError>;

    fn teardown_swapchain(&mut self);
    fn teardown_surface(&mut self);
    fn teardown_device(&mut self);

    /// Submit one frame.
    fn present(&mut self, buffers: &DrawBuffers) -> Result<(), SurfaceError>;
}

/// Requests from the window to the OS.
pub trait Platform {
    fn set_cursor(&mut self, cursor: Cursor);

    /// Ask the OS to resize the window. The OS answers through
    /// [`Window::window_changed_size`](crate::Window::window_changed_size).
    fn set_window_size(&mut self, extent: Extent);

    fn close_window(&mut self);
    fn minimize_window(&mut self);
    fn maximize_window(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_errors_map_to_lost_states() {
        assert_eq!(
            SurfaceError::SwapchainOutOfDate.lost_state(),
            Some(WindowState::SwapchainLost)
        );
        assert_eq!(
            SurfaceError::Other("oom".into()).lost_state(),
            Some(WindowState::DeviceLost)
        );
        assert_eq!(SurfaceError::NotReady.lost_state(), None);
    }
}
