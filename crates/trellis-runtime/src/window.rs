#![forbid(unsafe_code)]

//! Per-window orchestration: state machine, frame loop, extent limits and
//! input routing.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, debug_span, error, info, warn};
use trellis_core::cursor::Cursor;
use trellis_core::event::{KeyboardEvent, MouseEvent, MouseEventKind};
use trellis_core::geometry::{Extent, Point};
use trellis_core::keybinding::{Command, KeybindingTable};
use trellis_core::time::TimePoint;
use trellis_core::trigger::{Trigger, level};
use trellis_layout::{Alignment, Constraint, SolverError, Variable};
use trellis_widgets::{
    DrawBuffers, HitBox, Theme, TreeError, Widget, WidgetId, WidgetTree, WindowWidget,
};

use crate::config::WindowConfig;
use crate::handle::{Request, WindowHandle};
use crate::state::WindowState;
use crate::surface::{Platform, Surface};

/// Layout did not settle within the configured number of passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    DidNotConverge { retries: u32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DidNotConverge { retries } => write!(
                f,
                "constraints were still changing after {retries} extra layout passes"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// What a call to [`Window::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was due.
    Idle,
    /// Not ready to draw; recovery was attempted and the window is now in
    /// the given state.
    NotReady(WindowState),
    /// A frame was drawn and handed to the surface.
    Presented { vertices: usize },
    /// The frame was drawn but the surface refused it.
    Dropped,
    /// The window is gone.
    Closed,
}

/// One OS window and the widgets in it.
///
/// A window is bound to the thread that created it. Other threads talk to
/// it through a [`WindowHandle`].
pub struct Window<S: Surface, P: Platform> {
    config: WindowConfig,
    state: WindowState,
    surface: S,
    platform: P,
    tree: WidgetTree,
    root: WidgetId,
    trigger: Arc<Trigger>,
    bindings: KeybindingTable,
    buffers: DrawBuffers,
    /// Constraints added through the window, removed on request.
    constraints: Vec<Constraint>,
    current_extent: Extent,
    minimum_extent: Extent,
    maximum_extent: Extent,
    mouse_target: Option<WidgetId>,
    keyboard_target: Option<WidgetId>,
    cursor: Cursor,
    layout_error: Option<LayoutError>,
    sender: Sender<Request>,
    requests: Receiver<Request>,
}

impl<S: Surface, P: Platform> fmt::Debug for Window<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.config.title)
            .field("state", &self.state)
            .field("current_extent", &self.current_extent)
            .field("minimum_extent", &self.minimum_extent)
            .field("maximum_extent", &self.maximum_extent)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, P: Platform> Window<S, P> {
    /// Create a window with an empty root widget.
    pub fn new(
        config: WindowConfig,
        surface: S,
        platform: P,
        theme: Arc<dyn Theme>,
        bindings: KeybindingTable,
    ) -> Result<Self, TreeError> {
        let trigger = Arc::new(Trigger::new());
        let mut tree = WidgetTree::new(theme, Arc::clone(&trigger));
        tree.set_window_active(config.start_active);
        let root = tree.set_root(WindowWidget::new(config.title.clone()))?;
        let (sender, requests) = mpsc::channel();
        let current_extent = config.extent;
        let mut window = Self {
            config,
            state: WindowState::Initializing,
            surface,
            platform,
            tree,
            root,
            trigger,
            bindings,
            buffers: DrawBuffers::new(),
            constraints: Vec::new(),
            current_extent,
            minimum_extent: Extent::ZERO,
            maximum_extent: Extent::ZERO,
            mouse_target: None,
            keyboard_target: None,
            cursor: Cursor::None,
            layout_error: None,
            sender,
            requests,
        };
        window.update_extent_limits();
        info!(title = %window.config.title, extent = ?window.current_extent, "window created");
        Ok(window)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> WindowState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The root [`WindowWidget`].
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn bindings(&self) -> &KeybindingTable {
        &self.bindings
    }

    /// Vertices of the last drawn frame.
    pub fn buffers(&self) -> &DrawBuffers {
        &self.buffers
    }

    #[inline]
    pub fn current_extent(&self) -> Extent {
        self.current_extent
    }

    #[inline]
    pub fn minimum_extent(&self) -> Extent {
        self.minimum_extent
    }

    #[inline]
    pub fn maximum_extent(&self) -> Extent {
        self.maximum_extent
    }

    #[inline]
    pub fn mouse_target(&self) -> Option<WidgetId> {
        self.mouse_target
    }

    #[inline]
    pub fn keyboard_target(&self) -> Option<WidgetId> {
        self.keyboard_target
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Set if the most recent frame gave up on layout convergence.
    pub fn last_layout_error(&self) -> Option<LayoutError> {
        self.layout_error
    }

    /// A thread-safe handle for requesting work from other threads.
    pub fn handle(&self) -> WindowHandle {
        WindowHandle::new(self.sender.clone(), Arc::clone(&self.trigger))
    }

    /// When the window next needs a frame, if anything is pending.
    pub fn next_wakeup(&self) -> Option<TimePoint> {
        let (deadline, pending) = self.trigger.peek();
        (pending != level::NONE).then_some(deadline)
    }

    // ── Widgets ─────────────────────────────────────────────────────────

    /// Add a widget to the root's content area.
    pub fn add_widget<W: Widget>(
        &mut self,
        widget: W,
        alignment: Alignment,
    ) -> Result<WidgetId, TreeError> {
        self.tree.add_widget(self.root, widget, alignment)
    }

    /// Remove a widget and its subtree. Input targets inside the subtree are
    /// dropped without Exited events, and window-level constraints naming
    /// the subtree's variables are removed with it.
    pub fn remove_widget(&mut self, id: WidgetId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::UnknownWidget(id));
        }
        let variables = self.tree.subtree_variables(id);
        let removed = self.tree.remove_widget(id)?;
        let solver = self.tree.solver_mut();
        let mut kept = Vec::with_capacity(self.constraints.len());
        for c in self.constraints.drain(..) {
            if c.expr().terms.iter().any(|t| variables.contains(&t.variable)) {
                solver.remove_constraint(&c)?;
            } else {
                kept.push(c);
            }
        }
        self.constraints = kept;
        if self.mouse_target.is_some_and(|t| removed.contains(&t)) {
            self.mouse_target = None;
        }
        if self.keyboard_target.is_some_and(|t| removed.contains(&t)) {
            self.keyboard_target = None;
        }
        self.update_extent_limits();
        self.tree.force_layout_all();
        Ok(())
    }

    // ── Constraints ─────────────────────────────────────────────────────

    /// Add a window-level constraint, then recompute the extent limits and
    /// relayout everything.
    ///
    /// # Panics
    ///
    /// If the solver rejects the constraint. See [`Window::try_add_constraint`].
    pub fn add_constraint(&mut self, c: Constraint) {
        if let Err(e) = self.try_add_constraint(c) {
            error!(error = %e, "window constraint rejected");
            panic!("window constraint rejected: {e}");
        }
    }

    /// # Panics
    ///
    /// If `c` is not in the solver.
    pub fn remove_constraint(&mut self, c: &Constraint) {
        if let Err(e) = self.try_remove_constraint(c) {
            error!(error = %e, "window constraint removal failed");
            panic!("window constraint removal failed: {e}");
        }
    }

    pub fn try_add_constraint(&mut self, c: Constraint) -> Result<(), SolverError> {
        self.tree.solver_mut().add_constraint(c.clone())?;
        self.constraints.push(c);
        self.constraints_changed();
        Ok(())
    }

    pub fn try_remove_constraint(&mut self, c: &Constraint) -> Result<(), SolverError> {
        self.tree.solver_mut().remove_constraint(c)?;
        self.constraints.retain(|owned| owned != c);
        self.constraints_changed();
        Ok(())
    }

    fn constraints_changed(&mut self) {
        self.update_extent_limits();
        self.tree.force_layout_all();
    }

    // ── Extent ──────────────────────────────────────────────────────────

    fn root_variables(&self) -> Option<(Variable, Variable)> {
        self.tree
            .core(self.root)
            .map(|core| (core.box_model.width, core.box_model.height))
    }

    /// Suggest an extent to the root's edit variables and read back what
    /// the solver settled on.
    ///
    /// The edit variables are added at the configured stay strength on first
    /// use and stay in place, so the last suggestion keeps holding the root.
    fn suggest_root_extent(&mut self, width: f64, height: f64) -> Result<Extent, SolverError> {
        let Some((w, h)) = self.root_variables() else {
            return Ok(Extent::ZERO);
        };
        let strength = self.config.stay_strength;
        let solver = self.tree.solver_mut();
        solver.add_edit_variable(w, strength)?;
        solver.add_edit_variable(h, strength)?;
        solver.suggest(w, width)?;
        solver.suggest(h, height)?;
        Ok(Extent::new(solver.value(w) as f32, solver.value(h) as f32))
    }

    fn hold_extent(&mut self, extent: Extent) -> Result<(), SolverError> {
        self.suggest_root_extent(f64::from(extent.width), f64::from(extent.height))
            .map(drop)
    }

    /// Derive the window's minimum and maximum extent from the constraints.
    ///
    /// The root extent is suggested to be zero and then the sentinel, and
    /// the solver's closest feasible answers become the limits. The current
    /// extent is clamped into them and suggested again; if clamping changed
    /// it, the platform is asked to resize.
    ///
    /// # Panics
    ///
    /// If the solver rejects the suggestion, e.g. when the stay strength is
    /// `REQUIRED`.
    fn update_extent_limits(&mut self) {
        if let Err(e) = self.try_update_extent_limits() {
            error!(error = %e, "extent probe failed");
            panic!("extent probe failed: {e}");
        }
    }

    fn try_update_extent_limits(&mut self) -> Result<(), SolverError> {
        let sentinel = self.config.extent_sentinel;
        let minimum = self.suggest_root_extent(0.0, 0.0)?;
        let maximum = self.suggest_root_extent(sentinel, sentinel)?;
        self.minimum_extent = minimum;
        self.maximum_extent = maximum;

        let clamped = self.current_extent.clamp(minimum, maximum);
        if clamped != self.current_extent {
            info!(from = ?self.current_extent, to = ?clamped, "clamping window extent");
            self.current_extent = clamped;
            self.platform.set_window_size(clamped);
            if self.state.is_ready() {
                self.transition(WindowState::SwapchainLost);
            }
        }
        self.hold_extent(self.current_extent)?;
        self.tree.solver_mut().take_constraints_updated();
        info!(?minimum, ?maximum, "window extent limits");
        Ok(())
    }

    /// The OS resized the window.
    pub fn window_changed_size(&mut self, extent: Extent) {
        if extent == self.current_extent {
            return;
        }
        debug!(?extent, "window resized");
        self.current_extent = extent;
        if let Err(e) = self.hold_extent(extent) {
            error!(error = %e, "resize constraint rejected");
            panic!("resize constraint rejected: {e}");
        }
        self.tree.solver_mut().take_constraints_updated();
        if self.state.is_ready() {
            self.transition(WindowState::SwapchainLost);
        }
        self.tree.force_layout_all();
    }

    // ── State machine ───────────────────────────────────────────────────

    fn transition(&mut self, to: WindowState) {
        if self.state != to {
            info!(from = %self.state, %to, "window state");
            self.state = to;
        }
    }

    fn teardown(&mut self) {
        let target = self.state.after_teardown();
        match self.state {
            WindowState::SwapchainLost => self.surface.teardown_swapchain(),
            WindowState::SurfaceLost => {
                self.surface.teardown_swapchain();
                self.surface.teardown_surface();
            }
            WindowState::DeviceLost | WindowState::WindowLost => {
                self.surface.teardown_swapchain();
                self.surface.teardown_surface();
                self.surface.teardown_device();
            }
            _ => return,
        }
        self.transition(target);
    }

    /// Build resources up to `ReadyToRender`, stopping at the first
    /// failure.
    fn build(&mut self) {
        loop {
            let next = match self.state {
                WindowState::Initializing => Ok(WindowState::NoDevice),
                WindowState::NoDevice => self
                    .surface
                    .build_device()
                    .map(|()| WindowState::NoSurface),
                WindowState::NoSurface => self
                    .surface
                    .build_surface()
                    .map(|()| WindowState::NoSwapchain),
                WindowState::NoSwapchain if self.current_extent.is_empty() => return,
                WindowState::NoSwapchain => self
                    .surface
                    .build_swapchain(self.current_extent)
                    .map(|()| WindowState::ReadyToRender),
                _ => return,
            };
            match next {
                Ok(state) => self.transition(state),
                Err(e) => {
                    warn!(state = %self.state, error = %e, "building window resources failed");
                    return;
                }
            }
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────

    fn drain_requests(&mut self) {
        while let Ok(request) = self.requests.try_recv() {
            match request {
                Request::Relayout => self.tree.force_layout_all(),
                Request::Job(job) => job(&mut self.tree),
                Request::Close => self.close_window(),
            }
        }
    }

    /// Run layout passes until no widget changes constraints.
    fn layout(&mut self, now: TimePoint) {
        self.layout_error = None;
        let mut force = false;
        for attempt in 0..=self.config.layout_retries {
            self.tree.layout_pass(now, force);
            if !self.tree.solver_mut().take_constraints_updated() {
                return;
            }
            debug!(attempt, "constraints changed during layout");
            self.update_extent_limits();
            force = true;
        }
        let e = LayoutError::DidNotConverge {
            retries: self.config.layout_retries,
        };
        error!(error = %e, "layout did not converge");
        self.layout_error = Some(e);
    }

    /// Produce one frame for display at `now`.
    pub fn render(&mut self, now: TimePoint) -> RenderOutcome {
        let _span = debug_span!("window.render", state = %self.state).entered();
        self.drain_requests();

        if self.state == WindowState::NoWindow {
            return RenderOutcome::Closed;
        }
        if !self.state.is_ready() {
            self.teardown();
            self.build();
            if self.state == WindowState::NoWindow {
                return RenderOutcome::Closed;
            }
            // The next frame draws everything.
            self.tree.request_redraw_all();
            return RenderOutcome::NotReady(self.state);
        }

        if self.trigger.check(now) == level::NONE {
            return RenderOutcome::Idle;
        }

        self.layout(now);
        // Layout may have clamped the extent and lost the swapchain.
        if !self.state.is_ready() {
            self.tree.request_redraw_all();
            return RenderOutcome::NotReady(self.state);
        }
        self.tree.snapshot_geometry();

        self.buffers.clear();
        self.tree.draw(&mut self.buffers, now);
        let outcome = match self.surface.present(&self.buffers) {
            Ok(()) => RenderOutcome::Presented {
                vertices: self.buffers.vertex_count(),
            },
            Err(e) => {
                warn!(error = %e, "present failed");
                if let Some(lost) = e.lost_state() {
                    self.transition(lost);
                }
                self.tree.request_redraw_all();
                RenderOutcome::Dropped
            }
        };

        if let Some((deadline, pending)) = self.tree.pending_trigger() {
            self.trigger.add(deadline, pending);
        }
        outcome
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// The topmost widget at `position`.
    pub fn hit_box_test(&self, position: Point) -> HitBox {
        self.tree.hit_box_test(position)
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.platform.set_cursor(cursor);
        }
    }

    /// Move the mouse target, sending Exited to the old target before
    /// Entered to the new one.
    pub fn update_mouse_target(&mut self, target: Option<WidgetId>, position: Point) {
        if target == self.mouse_target {
            return;
        }
        if let Some(old) = self.mouse_target.take() {
            self.tree.handle_mouse_event(old, &MouseEvent::exited(position));
        }
        self.mouse_target = target;
        if let Some(new) = target {
            self.tree.handle_mouse_event(new, &MouseEvent::entered(position));
        }
    }

    /// Move keyboard focus, sending Exited to the old target before Entered
    /// to the new one.
    pub fn update_keyboard_target(&mut self, target: Option<WidgetId>) {
        let target = target.filter(|&id| self.tree.is_focusable(id));
        if target == self.keyboard_target {
            return;
        }
        if let Some(old) = self.keyboard_target.take() {
            self.tree
                .handle_keyboard_event(old, &KeyboardEvent::Exited, &self.bindings);
        }
        self.keyboard_target = target;
        if let Some(new) = target {
            self.tree
                .handle_keyboard_event(new, &KeyboardEvent::Entered, &self.bindings);
        }
        debug!(target = ?self.keyboard_target, "keyboard target");
    }

    /// Route an OS mouse event (window coordinates).
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> bool {
        if event.kind == MouseEventKind::Exited {
            self.update_mouse_target(None, event.position);
            self.set_cursor(Cursor::None);
            return true;
        }
        let hit = self.tree.hit_box_test(event.position);
        self.set_cursor(hit.kind.cursor());
        self.update_mouse_target(hit.widget, event.position);
        if event.is_left_press() {
            self.update_keyboard_target(hit.widget);
        }
        match (event.kind, self.mouse_target) {
            (MouseEventKind::Entered, _) | (_, None) => false,
            (_, Some(target)) => self.tree.handle_mouse_event(target, &event),
        }
    }

    /// Route an OS keyboard event.
    ///
    /// Entered and Exited refer to the window gaining or losing input focus.
    /// Commands no widget handles fall back to window handling: Tab and
    /// Shift-Tab walk the focus chain.
    pub fn handle_keyboard_event(&mut self, event: KeyboardEvent) -> bool {
        match event {
            KeyboardEvent::Entered => {
                self.tree.set_window_active(true);
                true
            }
            KeyboardEvent::Exited => {
                self.tree.set_window_active(false);
                true
            }
            KeyboardEvent::Grapheme(_) => match self.keyboard_target {
                Some(target) => {
                    self.tree
                        .handle_keyboard_event(target, &event, &self.bindings);
                    true
                }
                None => false,
            },
            KeyboardEvent::Key(press) => {
                let bound = self.bindings.translate(&press).len();
                let unhandled = match self.keyboard_target {
                    Some(target) => self
                        .tree
                        .handle_keyboard_event(target, &event, &self.bindings),
                    None => self.bindings.translate(&press).to_vec(),
                };
                let mut handled = unhandled.len() < bound;
                for command in unhandled {
                    handled |= self.handle_command(command);
                }
                handled
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::WidgetNext | Command::WidgetPrev => {
                let reverse = command == Command::WidgetPrev;
                let next = self.tree.next_keyboard_widget(self.keyboard_target, reverse);
                self.update_keyboard_target(next);
                true
            }
            Command::Cancel if self.keyboard_target.is_some() => {
                self.update_keyboard_target(None);
                true
            }
            _ => false,
        }
    }

    /// Window focus changed.
    pub fn set_active(&mut self, active: bool) {
        self.tree.set_window_active(active);
    }

    // ── Window management ───────────────────────────────────────────────

    /// Close the OS window; the next frame tears everything down.
    pub fn close_window(&mut self) {
        self.platform.close_window();
        self.transition(WindowState::WindowLost);
    }

    pub fn minimize_window(&mut self) {
        self.platform.minimize_window();
    }

    pub fn maximize_window(&mut self) {
        self.platform.maximize_window();
    }
}
