#![forbid(unsafe_code)]

//! Trellis public facade crate.
//!
//! Re-exports the types an application needs to build a widget tree and
//! drive it through a window, plus a prelude for everyday use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use trellis_core::cursor::Cursor;
pub use trellis_core::event::{
    KeyCode, KeyPress, KeyboardEvent, Modifiers, MouseButtons, MouseEvent, MouseEventKind,
};
pub use trellis_core::geometry::{Extent, Point, Rect, Sides};
pub use trellis_core::keybinding::{Command, KeybindingTable};
pub use trellis_core::time::TimePoint;
pub use trellis_core::trigger::Trigger;

// --- Layout re-exports -----------------------------------------------------

pub use trellis_layout::{
    Alignment, BoxModel, Constraint, RelationalOperator, SolverError, Variable, WidgetSolver,
    constraint, strength,
};

// --- Widget re-exports -----------------------------------------------------

pub use trellis_widgets::{
    Backing, BackingError, ButtonWidget, Color, ContainerWidget, DefaultTheme, DrawBuffers,
    DrawContext, EventContext, HitBox, HitBoxKind, ImageHandle, ImageWidget, LabelWidget,
    LayoutContext, MonospaceText, Needs, Observable, ShapedText, Theme, TreeError, Widget,
    WidgetCore, WidgetId, WidgetTree, WindowWidget,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use trellis_runtime::{
    HeadlessSurface, LayoutError, Platform, RecordingPlatform, RenderOutcome, Surface,
    SurfaceError, Window, WindowConfig, WindowGone, WindowHandle, WindowState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for trellis apps.
#[derive(Debug)]
pub enum Error {
    /// Widget tree operation on a missing widget or a second root.
    Tree(TreeError),
    /// Constraint rejected by the solver.
    Solver(SolverError),
    /// A cross-thread request reached a dropped window.
    #[cfg(feature = "runtime")]
    WindowGone,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(err) => write!(f, "{err}"),
            Self::Solver(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::WindowGone => fmt::Display::fmt(&WindowGone, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Solver(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::WindowGone => None,
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<SolverError> for Error {
    fn from(err: SolverError) -> Self {
        Self::Solver(err)
    }
}

#[cfg(feature = "runtime")]
impl From<WindowGone> for Error {
    fn from(_: WindowGone) -> Self {
        Self::WindowGone
    }
}

/// Standard result type for trellis APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, ButtonWidget, Command, Error, Extent, KeyCode, KeyboardEvent, LabelWidget,
        LayoutContext, MonospaceText, MouseEvent, Observable, Point, Rect, Result, TimePoint,
        Widget, WidgetId,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{RenderOutcome, Window, WindowConfig, WindowHandle};

    pub use crate::{core, layout, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use trellis_core as core;
pub use trellis_layout as layout;
#[cfg(feature = "runtime")]
pub use trellis_runtime as runtime;
pub use trellis_widgets as widgets;
