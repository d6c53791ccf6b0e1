#![forbid(unsafe_code)]

//! Window orchestration for trellis widget trees.
//!
//! A [`Window`] owns one [`WidgetTree`](trellis_widgets::WidgetTree) and
//! drives it once per displayed frame through [`Window::render`]. It also
//! owns the window state machine that gates GPU work, derives the window's
//! minimum and maximum extent from the constraint graph, and routes input to
//! the widget under the pointer or with keyboard focus.
//!
//! GPU and OS collaborators are reached through the [`Surface`] and
//! [`Platform`] traits; [`headless`] has implementations for tests and
//! offscreen use.

pub mod config;
pub mod handle;
pub mod headless;
pub mod state;
pub mod surface;
pub mod window;

pub use config::WindowConfig;
pub use handle::{WindowGone, WindowHandle};
pub use headless::{HeadlessSurface, PresentedFrame, RecordingPlatform, SurfaceCall};
pub use state::WindowState;
pub use surface::{Platform, Surface, SurfaceError};
pub use window::{LayoutError, RenderOutcome, Window};
