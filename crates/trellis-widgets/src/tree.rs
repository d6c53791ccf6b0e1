#![forbid(unsafe_code)]

//! The widget arena.
//!
//! Widgets are stored in a slot vector and addressed by [`WidgetId`]. A slot
//! carries a generation counter that is bumped when its widget is removed, so
//! stale ids stop resolving instead of aliasing a newer widget.
//!
//! The tree also owns the constraint solver shared by every widget in the
//! window, the theme, and the window trigger that all widget triggers feed.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use trellis_core::geometry::{Point, Rect};
use trellis_core::trigger::{Trigger, level};
use trellis_layout::{
    Alignment, BoxModel, Constraint, RelationalOperator, SolverError, Variable, WidgetSolver,
    constraint, strength,
};

use crate::Widget;
use crate::base::WidgetCore;
use crate::context::LayoutContext;
use crate::id::WidgetId;
use crate::theme::Theme;

/// Errors from structural tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The id does not name a live widget.
    UnknownWidget(WidgetId),
    /// The tree already has a root.
    RootExists,
    /// The solver rejected a structural constraint.
    Solver(SolverError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWidget(id) => write!(f, "no widget {id} in this tree"),
            Self::RootExists => write!(f, "the tree already has a root widget"),
            Self::Solver(_) => write!(f, "structural constraint rejected"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Solver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SolverError> for TreeError {
    fn from(e: SolverError) -> Self {
        Self::Solver(e)
    }
}

/// Log and abort. Constraint failures inside the frame protocol mean a
/// widget implementation is broken.
#[track_caller]
pub(crate) fn fatal(id: WidgetId, action: &str, error: &dyn fmt::Display) -> ! {
    trellis_core::error!(widget = %id, %error, "{action} failed");
    panic!("{action} failed for widget {id}: {error}");
}

pub(crate) struct Node {
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) content: Option<WidgetId>,
    pub(crate) core: WidgetCore,
    /// Taken out while one of the widget's own hooks runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Constraints removed from the solver together with the widget.
    pub(crate) owned: Vec<Constraint>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// All widgets of one window and the solver that positions them.
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    root: Option<WidgetId>,
    pub(crate) solver: WidgetSolver,
    pub(crate) theme: Arc<dyn Theme>,
    window_trigger: Arc<Trigger>,
    pub(crate) window_active: bool,
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .field("window_active", &self.window_active)
            .finish_non_exhaustive()
    }
}

fn lookup(slots: &[Slot], id: WidgetId) -> Option<&Node> {
    slots
        .get(id.idx as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.node.as_ref())
}

fn lookup_mut(slots: &mut [Slot], id: WidgetId) -> Option<&mut Node> {
    slots
        .get_mut(id.idx as usize)
        .filter(|slot| slot.generation == id.generation)
        .and_then(|slot| slot.node.as_mut())
}

fn box_variables(box_model: &BoxModel) -> [Variable; 4] {
    [
        box_model.left,
        box_model.bottom,
        box_model.width,
        box_model.height,
    ]
}

impl WidgetTree {
    #[must_use]
    pub fn new(theme: Arc<dyn Theme>, window_trigger: Arc<Trigger>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            root: None,
            solver: WidgetSolver::new(),
            theme,
            window_trigger,
            window_active: true,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[inline]
    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        lookup(&self.slots, id).is_some()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children in paint order. Empty for unknown ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The child that receives widgets added to `id`, if any.
    pub fn content(&self, id: WidgetId) -> Option<WidgetId> {
        self.node(id).and_then(|n| n.content)
    }

    pub fn core(&self, id: WidgetId) -> Option<&WidgetCore> {
        self.node(id).map(|n| &n.core)
    }

    pub fn core_mut(&mut self, id: WidgetId) -> Option<&mut WidgetCore> {
        self.node_mut(id).map(|n| &mut n.core)
    }

    /// The widget behind `id`. `None` while the widget's own hook runs.
    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.node(id).and_then(|n| n.widget.as_deref())
    }

    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    #[inline]
    pub fn window_trigger(&self) -> &Arc<Trigger> {
        &self.window_trigger
    }

    #[inline]
    pub fn solver(&self) -> &WidgetSolver {
        &self.solver
    }

    #[inline]
    pub fn solver_mut(&mut self) -> &mut WidgetSolver {
        &mut self.solver
    }

    #[inline]
    pub fn window_active(&self) -> bool {
        self.window_active
    }

    /// Focus and accent colors depend on this; changing it repaints.
    pub fn set_window_active(&mut self, active: bool) {
        if self.window_active != active {
            self.window_active = active;
            self.request_redraw_all();
        }
    }

    /// The rectangle the solver currently assigns to `id`, in window
    /// coordinates. Unlike the cached geometry this reflects constraint
    /// changes made earlier in the same frame.
    pub fn solved_rectangle(&self, id: WidgetId) -> Option<Rect> {
        self.node(id)
            .map(|n| n.core.box_model.current_rectangle(&self.solver))
    }

    pub(crate) fn node(&self, id: WidgetId) -> Option<&Node> {
        lookup(&self.slots, id)
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        lookup_mut(&mut self.slots, id)
    }

    /// All live widgets, parents before children, siblings in paint order.
    pub fn preorder(&self) -> Vec<WidgetId> {
        let mut order = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.collect_preorder(root, &mut order);
        }
        order
    }

    pub(crate) fn collect_preorder(&self, id: WidgetId, order: &mut Vec<WidgetId>) {
        if let Some(node) = self.node(id) {
            order.push(id);
            for &child in &node.children {
                self.collect_preorder(child, order);
            }
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Install the root widget. Its bottom-left corner is pinned to the
    /// window origin.
    pub fn set_root<W: Widget>(&mut self, widget: W) -> Result<WidgetId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::RootExists);
        }
        self.attach(None, Box::new(widget), None)
    }

    /// Add `widget` under `parent`.
    ///
    /// If `parent` has a content slot the widget lands there instead. The
    /// child is kept inside the parent's padded rectangle and pulled towards
    /// `alignment`.
    pub fn add_widget<W: Widget>(
        &mut self,
        parent: WidgetId,
        widget: W,
        alignment: Alignment,
    ) -> Result<WidgetId, TreeError> {
        self.add_boxed(parent, Box::new(widget), alignment)
    }

    pub fn add_boxed(
        &mut self,
        parent: WidgetId,
        widget: Box<dyn Widget>,
        alignment: Alignment,
    ) -> Result<WidgetId, TreeError> {
        let target = self.content_target(parent)?;
        self.attach(Some(target), widget, Some(alignment))
    }

    /// Follow content slots down from `id`.
    fn content_target(&self, id: WidgetId) -> Result<WidgetId, TreeError> {
        let mut target = id;
        loop {
            let node = self.node(target).ok_or(TreeError::UnknownWidget(target))?;
            match node.content {
                Some(content) if content != target => target = content,
                _ => return Ok(target),
            }
        }
    }

    pub(crate) fn attach(
        &mut self,
        parent: Option<WidgetId>,
        widget: Box<dyn Widget>,
        alignment: Option<Alignment>,
    ) -> Result<WidgetId, TreeError> {
        let elevation = match parent {
            Some(p) => {
                self.node(p)
                    .ok_or(TreeError::UnknownWidget(p))?
                    .core
                    .elevation
                    + 1
            }
            None => 0,
        };

        let theme = self.theme.as_ref();
        let mut box_model = BoxModel::new()
            .with_margin(widget.margin(theme))
            .with_padding(widget.padding(theme));
        box_model.register(&mut self.solver)?;

        let placement = match (parent.and_then(|p| self.node(p)), alignment) {
            (Some(parent), Some(alignment)) => {
                box_model.align_within(&parent.core.box_model, alignment)
            }
            _ => vec![
                constraint(box_model.left, RelationalOperator::Equal, 0.0, strength::REQUIRED),
                constraint(box_model.bottom, RelationalOperator::Equal, 0.0, strength::REQUIRED),
            ],
        };
        let mut owned = Vec::with_capacity(placement.len());
        for c in placement {
            if let Err(e) = self.solver.add_constraint(c.clone()) {
                for added in &owned {
                    let _ = self.solver.remove_constraint(added);
                }
                let _ = box_model.deregister(&mut self.solver);
                return Err(e.into());
            }
            owned.push(c);
        }

        let name = widget.name();
        let core = WidgetCore::new(box_model, Arc::clone(&self.window_trigger), elevation);
        let node = Node {
            parent,
            children: Vec::new(),
            content: None,
            core,
            widget: Some(widget),
            owned,
        };
        let id = self.allocate(node);
        match parent {
            Some(p) => {
                if let Some(parent) = self.node_mut(p) {
                    parent.children.push(id);
                }
            }
            None => self.root = Some(id),
        }
        trellis_core::debug!(widget = %id, name, elevation, "widget attached");

        self.with_widget(id, |widget, tree| {
            let mut cx = LayoutContext::new(tree, id, trellis_core::time::TimePoint::MIN);
            widget.init(&mut cx);
        });
        self.window_trigger.raise(level::RELAYOUT);
        Ok(id)
    }

    fn allocate(&mut self, node: Node) -> WidgetId {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            WidgetId {
                idx,
                generation: slot.generation,
            }
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            WidgetId { idx, generation: 0 }
        }
    }

    /// Make `child` the content slot of `parent`.
    pub fn set_content(&mut self, parent: WidgetId, child: WidgetId) -> Result<(), TreeError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::UnknownWidget(child));
        }
        let node = self.node_mut(parent).ok_or(TreeError::UnknownWidget(parent))?;
        node.content = Some(child);
        Ok(())
    }

    /// The box variables of `id` and every widget below it.
    pub fn subtree_variables(&self, id: WidgetId) -> HashSet<Variable> {
        let mut order = Vec::new();
        self.collect_preorder(id, &mut order);
        order
            .iter()
            .filter_map(|&member| self.node(member))
            .flat_map(|node| box_variables(&node.core.box_model))
            .collect()
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Every constraint owned by a removed widget, and every constraint
    /// elsewhere in the tree that mentions a removed widget's variables, is
    /// taken out of the solver first. Returns the removed ids, parents first.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<Vec<WidgetId>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownWidget(id));
        }
        let mut removed = Vec::new();
        self.collect_preorder(id, &mut removed);
        let variables = self.subtree_variables(id);

        let Self { slots, solver, .. } = self;
        for &gone in removed.iter().rev() {
            if let Some(node) = lookup_mut(slots, gone) {
                for c in node.owned.drain(..) {
                    solver.remove_constraint(&c)?;
                }
                node.core.box_model.deregister(solver)?;
            }
        }
        let removed_set: HashSet<WidgetId> = removed.iter().copied().collect();
        for slot in slots.iter_mut() {
            let Some(node) = slot.node.as_mut() else {
                continue;
            };
            let mut kept = Vec::with_capacity(node.owned.len());
            for c in node.owned.drain(..) {
                let dangling = c
                    .expr()
                    .terms
                    .iter()
                    .any(|term| variables.contains(&term.variable));
                if dangling {
                    solver.remove_constraint(&c)?;
                } else {
                    kept.push(c);
                }
            }
            node.owned = kept;
            node.children.retain(|child| !removed_set.contains(child));
            if node.content.is_some_and(|c| removed_set.contains(&c)) {
                node.content = None;
            }
        }

        for &gone in &removed {
            let slot = &mut self.slots[gone.idx as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(gone.idx);
            self.len -= 1;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        trellis_core::debug!(widget = %id, count = removed.len(), "widget subtree removed");
        self.window_trigger.raise(level::RELAYOUT);
        Ok(removed)
    }

    // ── Constraints owned by widgets ────────────────────────────────────

    /// Add `c` to the solver, to be removed again with `owner`.
    pub fn add_owned_constraint(
        &mut self,
        owner: WidgetId,
        c: Constraint,
    ) -> Result<(), TreeError> {
        let Self { slots, solver, .. } = self;
        let node = lookup_mut(slots, owner).ok_or(TreeError::UnknownWidget(owner))?;
        solver.add_constraint(c.clone())?;
        node.owned.push(c);
        self.window_trigger.raise(level::RELAYOUT);
        Ok(())
    }

    /// Remove a constraint previously added for `owner`.
    pub fn remove_owned_constraint(
        &mut self,
        owner: WidgetId,
        c: &Constraint,
    ) -> Result<(), TreeError> {
        let Self { slots, solver, .. } = self;
        let node = lookup_mut(slots, owner).ok_or(TreeError::UnknownWidget(owner))?;
        solver.remove_constraint(c)?;
        node.owned.retain(|owned| owned != c);
        self.window_trigger.raise(level::RELAYOUT);
        Ok(())
    }

    /// Run `f` on a widget's box model and the solver. Failures are fatal.
    pub(crate) fn update_box_model(
        &mut self,
        id: WidgetId,
        action: &str,
        f: impl FnOnce(&mut BoxModel, &mut WidgetSolver) -> Result<(), SolverError>,
    ) {
        let Self { slots, solver, .. } = self;
        let Some(node) = lookup_mut(slots, id) else {
            fatal(id, action, &TreeError::UnknownWidget(id));
        };
        if let Err(e) = f(&mut node.core.box_model, solver) {
            fatal(id, action, &e);
        }
    }

    /// Take the widget out of its node, run `f`, and put it back.
    ///
    /// If `f` removed the widget from the tree it is dropped instead.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut WidgetTree) -> R,
    ) -> Option<R> {
        let mut widget = self.node_mut(id)?.widget.take()?;
        let result = f(widget.as_mut(), self);
        if let Some(node) = self.node_mut(id) {
            node.widget = Some(widget);
        }
        Some(result)
    }

    // ── Dirty flags ─────────────────────────────────────────────────────

    pub fn request_redraw(&mut self, id: WidgetId) {
        if let Some(core) = self.core_mut(id) {
            core.request_redraw();
        }
    }

    pub fn request_relayout(&mut self, id: WidgetId) {
        if let Some(core) = self.core_mut(id) {
            core.request_relayout();
        }
    }

    pub fn request_redraw_all(&mut self) {
        for node in self.slots.iter_mut().filter_map(|s| s.node.as_mut()) {
            node.core.force_redraw = true;
        }
        self.window_trigger.fire();
    }

    /// Mark every widget for relayout; used after constraint changes that
    /// can move anything.
    pub fn force_layout_all(&mut self) {
        for node in self.slots.iter_mut().filter_map(|s| s.node.as_mut()) {
            node.core.force_layout = true;
        }
        self.window_trigger.raise(level::RELAYOUT);
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        if let Some(core) = self.core_mut(id) {
            if core.enabled != enabled {
                core.enabled = enabled;
                core.request_redraw();
            }
        }
    }

    // ── Focus chain ─────────────────────────────────────────────────────

    fn accepts_focus(&self, id: WidgetId) -> bool {
        self.node(id).is_some_and(|n| {
            n.core.enabled && n.widget.as_deref().is_some_and(|w| w.accepts_focus())
        })
    }

    /// Widgets that Tab visits, in order.
    pub fn focus_chain(&self) -> Vec<WidgetId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.accepts_focus(id))
            .collect()
    }

    /// The widget after (or before, with `reverse`) `current` in the focus
    /// chain, wrapping around. From `None` this is the first (or last)
    /// focusable widget.
    pub fn next_keyboard_widget(
        &self,
        current: Option<WidgetId>,
        reverse: bool,
    ) -> Option<WidgetId> {
        let order = self.preorder();
        let n = order.len();
        match current.and_then(|c| order.iter().position(|&id| id == c)) {
            None if reverse => order.iter().rev().copied().find(|&id| self.accepts_focus(id)),
            None => order.iter().copied().find(|&id| self.accepts_focus(id)),
            Some(pos) => (1..=n)
                .map(|step| {
                    if reverse {
                        order[(pos + n - step) % n]
                    } else {
                        order[(pos + step) % n]
                    }
                })
                .find(|&id| self.accepts_focus(id)),
        }
    }

    /// Whether `id` may take keyboard focus.
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.accepts_focus(id)
    }

    /// The window-coordinate origin of `id` from the last snapshot.
    pub fn window_offset(&self, id: WidgetId) -> Option<Point> {
        self.core(id).map(|c| c.geometry().offset_from_window())
    }
}
