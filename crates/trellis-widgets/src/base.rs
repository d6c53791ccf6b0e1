#![forbid(unsafe_code)]

//! State shared by every widget.

use std::sync::Arc;

use trellis_core::atomic::{AtomicExtent, AtomicPoint};
use trellis_core::geometry::{Extent, Point, Rect};
use trellis_core::trigger::{Trigger, level};
use trellis_layout::BoxModel;

/// Geometry settled by the last layout pass.
///
/// Written by the layout thread once per frame and readable from any thread
/// through an `Arc`. Readers may see values up to one frame old.
#[derive(Debug, Default)]
pub struct CachedGeometry {
    extent: AtomicExtent,
    offset_from_parent: AtomicPoint,
    offset_from_window: AtomicPoint,
}

impl CachedGeometry {
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent.load()
    }

    #[inline]
    pub fn offset_from_parent(&self) -> Point {
        self.offset_from_parent.load()
    }

    #[inline]
    pub fn offset_from_window(&self) -> Point {
        self.offset_from_window.load()
    }

    /// The widget's rectangle at the origin.
    #[inline]
    pub fn rectangle(&self) -> Rect {
        Rect::from_extent(self.extent())
    }

    /// The widget's rectangle in window coordinates.
    #[inline]
    pub fn window_rectangle(&self) -> Rect {
        Rect::from_parts(self.offset_from_window(), self.extent())
    }

    /// Store new values; returns whether anything changed.
    pub(crate) fn store(&self, extent: Extent, from_parent: Point, from_window: Point) -> bool {
        let changed = self.extent() != extent
            || self.offset_from_parent() != from_parent
            || self.offset_from_window() != from_window;
        if changed {
            self.extent.store(extent);
            self.offset_from_parent.store(from_parent);
            self.offset_from_window.store(from_window);
        }
        changed
    }
}

/// Per-widget state managed by the tree.
#[derive(Debug)]
pub struct WidgetCore {
    pub box_model: BoxModel,
    geometry: Arc<CachedGeometry>,
    trigger: Arc<Trigger>,
    pub(crate) enabled: bool,
    pub(crate) hover: bool,
    pub(crate) focus: bool,
    pub(crate) force_layout: bool,
    pub(crate) force_redraw: bool,
    pub(crate) elevation: u32,
}

impl WidgetCore {
    pub(crate) fn new(box_model: BoxModel, window_trigger: Arc<Trigger>, elevation: u32) -> Self {
        Self {
            box_model,
            geometry: Arc::new(CachedGeometry::default()),
            trigger: Arc::new(Trigger::with_parent(window_trigger)),
            enabled: true,
            hover: false,
            focus: false,
            force_layout: true,
            force_redraw: true,
            elevation,
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn hover(&self) -> bool {
        self.hover
    }

    #[inline]
    pub fn focus(&self) -> bool {
        self.focus
    }

    /// Stacking depth. The root is 0, each nesting level adds 1.
    #[inline]
    pub fn elevation(&self) -> u32 {
        self.elevation
    }

    /// Theme nesting level; same as the elevation.
    #[inline]
    pub fn semantic_layer(&self) -> u32 {
        self.elevation
    }

    #[inline]
    pub fn geometry(&self) -> &CachedGeometry {
        &self.geometry
    }

    /// A handle to the cached geometry that other threads may keep.
    #[inline]
    pub fn geometry_handle(&self) -> Arc<CachedGeometry> {
        Arc::clone(&self.geometry)
    }

    #[inline]
    pub fn trigger(&self) -> &Arc<Trigger> {
        &self.trigger
    }

    /// Mark for repaint on the next frame.
    pub fn request_redraw(&mut self) {
        self.force_redraw = true;
        self.trigger.fire();
    }

    /// Mark for relayout on the next frame.
    pub fn request_relayout(&mut self) {
        self.force_layout = true;
        self.trigger.raise(level::RELAYOUT);
    }
}
