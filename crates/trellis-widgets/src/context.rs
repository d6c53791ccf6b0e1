#![forbid(unsafe_code)]

//! Contexts handed to widget hooks.
//!
//! [`LayoutContext`] is the widget's view of the tree during `init` and
//! `layout`: it can change the widget's own constraints and add children.
//! Solver failures here abort, see [`crate::tree`].
//!
//! [`EventContext`] is the narrower view during event handling: the widget's
//! own state and dirty flags only.

use std::sync::Arc;

use trellis_core::geometry::{Extent, Rect, Sides};
use trellis_core::time::TimePoint;
use trellis_core::trigger::Trigger;
use trellis_layout::{Alignment, BoxModel, Constraint};

use crate::Widget;
use crate::base::WidgetCore;
use crate::id::WidgetId;
use crate::theme::Theme;
use crate::tree::{WidgetTree, fatal};

/// Access to the tree while a widget lays itself out.
pub struct LayoutContext<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
    now: TimePoint,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId, now: TimePoint) -> Self {
        Self { tree, id, now }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Display time of the frame being laid out. [`TimePoint::MIN`] during
    /// `init`.
    #[inline]
    pub fn now(&self) -> TimePoint {
        self.now
    }

    pub fn theme(&self) -> &dyn Theme {
        self.tree.theme()
    }

    /// The theme margin on every side.
    pub fn margin(&self) -> Sides {
        Sides::all(self.tree.theme().margin())
    }

    pub fn core(&self) -> &WidgetCore {
        match self.tree.core(self.id) {
            Some(core) => core,
            None => fatal(self.id, "layout context", &"widget removed during its own hook"),
        }
    }

    pub fn box_model(&self) -> &BoxModel {
        &self.core().box_model
    }

    /// Another widget's box model, for relative placement.
    pub fn box_model_of(&self, id: WidgetId) -> Option<&BoxModel> {
        self.tree.core(id).map(|core| &core.box_model)
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.tree.parent(self.id)
    }

    pub fn children(&self) -> &[WidgetId] {
        self.tree.children(self.id)
    }

    /// The widget's trigger, for subscribing to outside changes.
    pub fn trigger(&self) -> Arc<Trigger> {
        Arc::clone(self.core().trigger())
    }

    /// The rectangle the solver assigns right now, window coordinates.
    pub fn current_rectangle(&self) -> Rect {
        self.box_model().current_rectangle(self.tree.solver())
    }

    pub fn window_active(&self) -> bool {
        self.tree.window_active()
    }

    // ── Extents ─────────────────────────────────────────────────────────

    pub fn set_minimum_extent(&mut self, extent: Extent) {
        self.tree
            .update_box_model(self.id, "set minimum extent", |bm, solver| {
                bm.set_minimum_extent(solver, extent)
            });
    }

    pub fn set_preferred_extent(&mut self, extent: Extent) {
        self.tree
            .update_box_model(self.id, "set preferred extent", |bm, solver| {
                bm.set_preferred_extent(solver, extent)
            });
    }

    /// A zero component leaves that dimension free.
    pub fn set_fixed_extent(&mut self, extent: Extent) {
        self.tree
            .update_box_model(self.id, "set fixed extent", |bm, solver| {
                bm.set_fixed_extent(solver, extent)
            });
    }

    pub fn set_fixed_width(&mut self, width: f32) {
        self.tree
            .update_box_model(self.id, "set fixed width", |bm, solver| {
                bm.set_fixed_width(solver, width)
            });
    }

    pub fn set_fixed_height(&mut self, height: f32) {
        self.tree
            .update_box_model(self.id, "set fixed height", |bm, solver| {
                bm.set_fixed_height(solver, height)
            });
    }

    // ── Constraints ─────────────────────────────────────────────────────

    /// Add a constraint owned by this widget. It is removed together with
    /// the widget.
    pub fn add_constraint(&mut self, c: Constraint) -> Constraint {
        if let Err(e) = self.tree.add_owned_constraint(self.id, c.clone()) {
            fatal(self.id, "add constraint", &e);
        }
        c
    }

    pub fn remove_constraint(&mut self, c: &Constraint) {
        if let Err(e) = self.tree.remove_owned_constraint(self.id, c) {
            fatal(self.id, "remove constraint", &e);
        }
    }

    fn place(
        &mut self,
        other: WidgetId,
        build: fn(&BoxModel, &BoxModel, f32) -> Constraint,
    ) -> Constraint {
        let margin = self.tree.theme().margin();
        let c = match self.box_model_of(other) {
            Some(other_model) => build(self.box_model(), other_model, margin),
            None => fatal(self.id, "place relative to widget", &format!("unknown {other}")),
        };
        self.add_constraint(c)
    }

    fn place_in_parent(
        &mut self,
        build: fn(&BoxModel, &BoxModel, f32) -> Constraint,
    ) -> Constraint {
        match self.parent() {
            Some(parent) => self.place(parent, build),
            None => fatal(self.id, "place in parent", &"root widget has no parent"),
        }
    }

    /// Keep this widget a theme margin below `other`.
    pub fn place_below(&mut self, other: WidgetId) -> Constraint {
        self.place(other, BoxModel::place_below)
    }

    pub fn place_above(&mut self, other: WidgetId) -> Constraint {
        self.place(other, BoxModel::place_above)
    }

    pub fn place_left_of(&mut self, other: WidgetId) -> Constraint {
        self.place(other, BoxModel::place_left_of)
    }

    pub fn place_right_of(&mut self, other: WidgetId) -> Constraint {
        self.place(other, BoxModel::place_right_of)
    }

    /// Stick to the parent's padded top edge.
    pub fn place_at_top(&mut self) -> Constraint {
        self.place_in_parent(BoxModel::place_at_top)
    }

    pub fn place_at_bottom(&mut self) -> Constraint {
        self.place_in_parent(BoxModel::place_at_bottom)
    }

    pub fn place_left(&mut self) -> Constraint {
        self.place_in_parent(BoxModel::place_left)
    }

    pub fn place_right(&mut self) -> Constraint {
        self.place_in_parent(BoxModel::place_right)
    }

    // ── Children ────────────────────────────────────────────────────────

    /// Attach a structural child directly under this widget, bypassing any
    /// content slot.
    pub fn add_widget<W: Widget>(&mut self, widget: W, alignment: Alignment) -> WidgetId {
        match self.tree.attach(Some(self.id), Box::new(widget), Some(alignment)) {
            Ok(id) => id,
            Err(e) => fatal(self.id, "add child widget", &e),
        }
    }

    /// Route widgets added to this widget into `child`.
    pub fn set_content(&mut self, child: WidgetId) {
        if let Err(e) = self.tree.set_content(self.id, child) {
            fatal(self.id, "set content slot", &e);
        }
    }

    /// Direct access to the tree for widgets that manage others.
    pub fn tree(&mut self) -> &mut WidgetTree {
        self.tree
    }

    pub fn request_redraw(&mut self) {
        self.tree.request_redraw(self.id);
    }
}

/// The widget's own state while it handles an event.
pub struct EventContext<'a> {
    id: WidgetId,
    core: &'a mut WidgetCore,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(id: WidgetId, core: &'a mut WidgetCore) -> Self {
        Self { id, core }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn core(&self) -> &WidgetCore {
        self.core
    }

    /// The widget's local rectangle from the last layout.
    pub fn rectangle(&self) -> Rect {
        self.core.geometry().rectangle()
    }

    pub fn request_redraw(&mut self) {
        self.core.request_redraw();
    }

    pub fn request_relayout(&mut self) {
        self.core.request_relayout();
    }
}
