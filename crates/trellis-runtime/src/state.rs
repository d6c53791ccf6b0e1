#![forbid(unsafe_code)]

//! The window state machine.
//!
//! ```text
//! Initializing -> NoDevice -> NoSurface -> NoSwapchain -> ReadyToRender
//!                    ^           ^             ^               |
//!                    |           |             |               v
//!               DeviceLost   SurfaceLost  SwapchainLost   (present error)
//!
//! WindowLost -> NoWindow
//! ```
//!
//! Lost states are left by tearing down to the matching `No*` state and
//! building up again. `NoWindow` is terminal.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowState {
    /// Created; no GPU resources requested yet.
    #[default]
    Initializing,
    /// The OS window is gone. Nothing further happens.
    NoWindow,
    NoDevice,
    NoSurface,
    NoSwapchain,
    ReadyToRender,
    /// The swapchain no longer matches the surface, usually after a resize.
    SwapchainLost,
    SurfaceLost,
    DeviceLost,
    /// The OS window was closed; everything must be torn down.
    WindowLost,
}

impl WindowState {
    /// Whether `render` may draw.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::ReadyToRender)
    }

    /// Whether resources must be torn down before building again.
    #[must_use]
    pub const fn is_lost(self) -> bool {
        matches!(
            self,
            Self::SwapchainLost | Self::SurfaceLost | Self::DeviceLost | Self::WindowLost
        )
    }

    /// The state a teardown from `self` ends in. Non-lost states map to
    /// themselves.
    #[must_use]
    pub const fn after_teardown(self) -> Self {
        match self {
            Self::SwapchainLost => Self::NoSwapchain,
            Self::SurfaceLost => Self::NoSurface,
            Self::DeviceLost => Self::NoDevice,
            Self::WindowLost => Self::NoWindow,
            other => other,
        }
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::NoWindow => "no-window",
            Self::NoDevice => "no-device",
            Self::NoSurface => "no-surface",
            Self::NoSwapchain => "no-swapchain",
            Self::ReadyToRender => "ready-to-render",
            Self::SwapchainLost => "swapchain-lost",
            Self::SurfaceLost => "surface-lost",
            Self::DeviceLost => "device-lost",
            Self::WindowLost => "window-lost",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_states_tear_down_to_matching_no_state() {
        assert_eq!(WindowState::SwapchainLost.after_teardown(), WindowState::NoSwapchain);
        assert_eq!(WindowState::SurfaceLost.after_teardown(), WindowState::NoSurface);
        assert_eq!(WindowState::DeviceLost.after_teardown(), WindowState::NoDevice);
        assert_eq!(WindowState::WindowLost.after_teardown(), WindowState::NoWindow);
        assert_eq!(WindowState::ReadyToRender.after_teardown(), WindowState::ReadyToRender);
    }

    #[test]
    fn only_ready_renders() {
        assert!(WindowState::ReadyToRender.is_ready());
        assert!(!WindowState::NoSwapchain.is_ready());
        assert!(WindowState::DeviceLost.is_lost());
        assert!(!WindowState::NoWindow.is_lost());
    }
}
