#![forbid(unsafe_code)]

//! Widget tree, per-frame protocol, and built-in widgets.
//!
//! Widgets live in a [`WidgetTree`] arena and are addressed by generational
//! [`WidgetId`]s. Each node pairs the widget's own behaviour (a boxed
//! [`Widget`]) with the state every widget shares ([`WidgetCore`]): its
//! [`BoxModel`](trellis_layout::BoxModel), cached geometry, state flags, and
//! frame [`Trigger`](trellis_core::trigger::Trigger).
//!
//! # Frame protocol
//!
//! Once per frame the window runs, across the whole tree:
//!
//! 1. [`WidgetTree::needs`]: consume the widget's trigger and report whether
//!    it needs relayout and/or redraw.
//! 2. [`WidgetTree::layout`]: let the widget update its constraints.
//! 3. [`WidgetTree::layout_children`]: recurse, aggregating what happened.
//! 4. [`WidgetTree::draw`]: emit vertices, parents before children.
//!
//! None of these steps can fail. Constraint errors raised while a widget
//! lays itself out are programming errors and abort with a diagnostic.

pub mod backing;
pub mod base;
pub mod button;
pub mod container;
pub mod context;
pub mod draw;
mod events;
mod frame;
pub mod hitbox;
pub mod id;
pub mod image;
pub mod label;
pub mod observable;
pub mod text;
pub mod theme;
pub mod tree;
pub mod window_widget;

use bitflags::bitflags;
use trellis_core::event::MouseEvent;
use trellis_core::geometry::{Point, Sides};
use trellis_core::keybinding::Command;
use trellis_core::time::TimePoint;

pub use backing::{Backing, BackingError, BackingPromise, BackingState};
pub use base::{CachedGeometry, WidgetCore};
pub use button::ButtonWidget;
pub use container::ContainerWidget;
pub use context::{EventContext, LayoutContext};
pub use draw::{DrawBuffers, DrawContext};
pub use hitbox::{HitBox, HitBoxKind};
pub use id::WidgetId;
pub use image::{ImageHandle, ImageWidget};
pub use label::LabelWidget;
pub use observable::Observable;
pub use text::{MonospaceText, ShapedText};
pub use theme::{Color, DefaultTheme, Theme};
pub use tree::{TreeError, WidgetTree};
pub use window_widget::WindowWidget;

bitflags! {
    /// Work a widget needs this frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Needs: u8 {
        /// Repaint.
        const REDRAW = 0b01;
        /// Recompute constraints. Always implies a repaint.
        const LAYOUT = 0b10;
    }
}

impl Needs {
    /// Map a trigger level onto frame work.
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        use trellis_core::trigger::level;
        if level >= level::RELAYOUT {
            Needs::LAYOUT | Needs::REDRAW
        } else if level >= level::REDRAW {
            Needs::REDRAW
        } else {
            Needs::empty()
        }
    }
}

/// Behaviour of a concrete widget type.
///
/// State shared by all widgets (geometry, hover/focus, dirty flags) lives in
/// [`WidgetCore`] and is handled by the tree before these hooks run. Every
/// method has a default, so a widget only implements what it customises.
pub trait Widget: 'static {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether Tab navigation or a click may give this widget keyboard focus.
    fn accepts_focus(&self) -> bool {
        false
    }

    /// Space kept free around the widget. Defaults to the theme margin.
    fn margin(&self, theme: &dyn Theme) -> Sides {
        Sides::all(theme.margin())
    }

    /// Space between the widget's edges and its children.
    fn padding(&self, _theme: &dyn Theme) -> Sides {
        Sides::ZERO
    }

    /// Called once after the widget is attached to the tree.
    ///
    /// This is where structural constraints and child widgets are created.
    fn init(&mut self, _cx: &mut LayoutContext<'_>) {}

    /// Extra work beyond what the trigger and dirty flags report, for
    /// example a background resource that became ready. Must not block.
    fn needs(&self, _core: &WidgetCore, _now: TimePoint) -> Needs {
        Needs::empty()
    }

    /// Recompute content-dependent constraints.
    fn layout(&mut self, _cx: &mut LayoutContext<'_>) {}

    /// Emit vertices. Runs before the children draw.
    fn draw(&self, _cx: &mut DrawContext<'_>) {}

    /// Classify a point inside this widget's rectangle. `position` is local.
    fn hit_box_kind(&self, _core: &WidgetCore, _position: Point) -> HitBoxKind {
        HitBoxKind::Default
    }

    /// Handle a mouse event in local coordinates. Return `true` if handled.
    fn handle_mouse_event(&mut self, _cx: &mut EventContext<'_>, _event: &MouseEvent) -> bool {
        false
    }

    /// Handle an abstract command. Return `false` to let it bubble up.
    fn handle_command(&mut self, _cx: &mut EventContext<'_>, _command: Command) -> bool {
        false
    }

    /// Handle composed text input.
    fn handle_grapheme(&mut self, _cx: &mut EventContext<'_>, _grapheme: char) -> bool {
        false
    }
}
