#![forbid(unsafe_code)]

//! The per-frame protocol: needs, layout, layout_children, draw.

use trellis_core::geometry::Point;
use trellis_core::time::TimePoint;
use trellis_core::trigger::level;

use crate::Needs;
use crate::context::LayoutContext;
use crate::draw::{DrawBuffers, DrawContext};
use crate::hitbox::{HitBox, HitBoxKind};
use crate::id::WidgetId;
use crate::tree::WidgetTree;

impl WidgetTree {
    /// Work `id` needs this frame.
    ///
    /// Consumes the widget's trigger if it is due; everything else is read
    /// only. A second call without intervening changes reports at most what
    /// the dirty flags still say.
    pub fn needs(&self, id: WidgetId, now: TimePoint) -> Needs {
        let Some(node) = self.node(id) else {
            return Needs::empty();
        };
        let core = &node.core;
        let mut needs = Needs::from_level(core.trigger().check(now));
        if core.force_layout {
            needs |= Needs::LAYOUT | Needs::REDRAW;
        }
        if core.force_redraw {
            needs |= Needs::REDRAW;
        }
        if let Some(widget) = node.widget.as_deref() {
            needs |= widget.needs(core, now);
        }
        needs
    }

    /// Run the layout hook of `id` alone.
    pub fn layout(&mut self, id: WidgetId, now: TimePoint) {
        self.with_widget(id, |widget, tree| {
            #[cfg(feature = "tracing")]
            let _span = tracing::debug_span!("widget.layout", widget = %id, name = widget.name())
                .entered();
            let mut cx = LayoutContext::new(tree, id, now);
            widget.layout(&mut cx);
        });
        if let Some(node) = self.node_mut(id) {
            node.core.force_layout = false;
            node.core.force_redraw = true;
        }
    }

    /// Lay out the children of `id` that need it, recursively.
    ///
    /// With `force` every descendant is laid out. Returns the union of what
    /// the subtree needed.
    pub fn layout_children(&mut self, id: WidgetId, now: TimePoint, force: bool) -> Needs {
        let children = self.children(id).to_vec();
        let mut done = Needs::empty();
        for child in children {
            done |= self.layout_one(child, now, force);
        }
        done
    }

    fn layout_one(&mut self, id: WidgetId, now: TimePoint, force: bool) -> Needs {
        let mut needs = self.needs(id, now);
        if force {
            needs |= Needs::LAYOUT | Needs::REDRAW;
        }
        if needs.contains(Needs::LAYOUT) {
            self.layout(id, now);
        }
        needs | self.layout_children(id, now, force)
    }

    /// One full layout sweep from the root.
    pub fn layout_pass(&mut self, now: TimePoint, force: bool) -> Needs {
        match self.root() {
            Some(root) => self.layout_one(root, now, force),
            None => Needs::empty(),
        }
    }

    /// Copy solved values into every widget's cached geometry.
    ///
    /// Widgets whose geometry moved are marked for redraw. Returns whether
    /// anything moved.
    pub fn snapshot_geometry(&mut self) -> bool {
        let order = self.preorder();
        let mut changed = false;
        for id in order {
            let parent_origin = self
                .parent(id)
                .and_then(|p| self.solved_rectangle(p))
                .map_or(Point::ZERO, |r| r.origin());
            let Some(rect) = self.solved_rectangle(id) else {
                continue;
            };
            let Some(core) = self.core_mut(id) else {
                continue;
            };
            let from_window = rect.origin();
            if core
                .geometry()
                .store(rect.extent(), from_window - parent_origin, from_window)
            {
                core.force_redraw = true;
                changed = true;
            }
        }
        changed
    }

    /// Emit every widget's vertices, parents before children.
    pub fn draw(&mut self, buffers: &mut DrawBuffers, now: TimePoint) {
        let order = self.preorder();
        for &id in &order {
            let Some(node) = self.node(id) else {
                continue;
            };
            let Some(widget) = node.widget.as_deref() else {
                continue;
            };
            #[cfg(feature = "tracing")]
            let _span =
                tracing::trace_span!("widget.draw", widget = %id, name = widget.name()).entered();
            let mut cx = DrawContext::new(
                buffers,
                self.theme.as_ref(),
                &node.core,
                self.window_active,
                now,
            );
            widget.draw(&mut cx);
        }
        for id in order {
            if let Some(core) = self.core_mut(id) {
                core.force_redraw = false;
            }
        }
    }

    /// Earliest deadline and highest level still pending on any widget
    /// trigger, without consuming them.
    pub fn pending_trigger(&self) -> Option<(TimePoint, u8)> {
        self.preorder()
            .into_iter()
            .filter_map(|id| self.core(id))
            .map(|core| core.trigger().peek())
            .filter(|&(_, lvl)| lvl != level::NONE)
            .reduce(|(t0, l0), (t1, l1)| (t0.min(t1), l0.max(l1)))
    }

    /// The topmost widget under `position` (window coordinates).
    pub fn hit_box_test(&self, position: Point) -> HitBox {
        let mut best = HitBox::NONE;
        if let Some(root) = self.root() {
            self.hit_box_at(root, position, &mut best);
        }
        best
    }

    fn hit_box_at(&self, id: WidgetId, position: Point, best: &mut HitBox) {
        let Some(node) = self.node(id) else {
            return;
        };
        let core = &node.core;
        let rect = core.geometry().window_rectangle();
        if rect.contains(position) {
            if let Some(widget) = node.widget.as_deref() {
                let mut kind = widget.hit_box_kind(core, position - rect.origin());
                if !core.enabled && kind > HitBoxKind::Default {
                    kind = HitBoxKind::Default;
                }
                if kind != HitBoxKind::Outside {
                    let candidate = HitBox::new(id, core.elevation, kind);
                    if candidate.supersedes(best) {
                        *best = candidate;
                    }
                }
            }
        }
        for &child in &node.children {
            self.hit_box_at(child, position, best);
        }
    }
}
