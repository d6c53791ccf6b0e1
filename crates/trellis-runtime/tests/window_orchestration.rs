#![forbid(unsafe_code)]

//! Window-level behaviour: extent limits, input routing, focus and frame
//! scheduling, driven through the headless surface.

use std::sync::{Arc, Mutex};
use std::thread;

use trellis_core::cursor::Cursor;
use trellis_core::event::{
    KeyCode, KeyPress, KeyboardEvent, Modifiers, MouseButtons, MouseEvent, MouseEventKind,
};
use trellis_core::geometry::{Extent, Point};
use trellis_core::keybinding::KeybindingTable;
use trellis_core::time::TimePoint;
use trellis_layout::{Alignment, Constraint, RelationalOperator, constraint, strength};
use trellis_runtime::{
    HeadlessSurface, LayoutError, RecordingPlatform, RenderOutcome, Window, WindowConfig,
    WindowState,
};
use trellis_widgets::{
    ButtonWidget, DefaultTheme, EventContext, LabelWidget, LayoutContext, MonospaceText, Widget,
    WidgetId,
};

type TestWindow = Window<HeadlessSurface, RecordingPlatform>;

fn window_with(config: WindowConfig) -> TestWindow {
    let mut window = Window::new(
        config,
        HeadlessSurface::new(),
        RecordingPlatform::new(),
        Arc::new(DefaultTheme::compact()),
        KeybindingTable::default(),
    )
    .unwrap();
    assert_eq!(
        window.render(TimePoint::MIN),
        RenderOutcome::NotReady(WindowState::ReadyToRender)
    );
    window
}

fn window() -> TestWindow {
    window_with(WindowConfig::default().with_extent(Extent::new(200.0, 100.0)))
}

fn presented(window: &mut TestWindow) {
    assert!(matches!(
        window.render(TimePoint::MIN),
        RenderOutcome::Presented { .. }
    ));
}

/// A fixed-size tile that records the mouse events it receives.
struct Tile {
    extent: Extent,
    minimum: bool,
    seen: Arc<Mutex<Vec<MouseEventKind>>>,
}

impl Tile {
    fn fixed(width: f32, height: f32) -> Self {
        Self {
            extent: Extent::new(width, height),
            minimum: false,
            seen: Arc::default(),
        }
    }

    fn at_least(width: f32, height: f32) -> Self {
        Self {
            minimum: true,
            ..Self::fixed(width, height)
        }
    }
}

impl Widget for Tile {
    fn name(&self) -> &'static str {
        "tile"
    }

    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        if self.minimum {
            cx.set_minimum_extent(self.extent);
        } else {
            cx.set_fixed_extent(self.extent);
        }
    }

    fn handle_mouse_event(&mut self, _cx: &mut EventContext<'_>, event: &MouseEvent) -> bool {
        self.seen.lock().unwrap().push(event.kind);
        true
    }
}

/// Adds or removes a constraint on every layout, so layout never settles.
#[derive(Default)]
struct Restless {
    held: Option<Constraint>,
}

impl Widget for Restless {
    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        match self.held.take() {
            Some(c) => cx.remove_constraint(&c),
            None => {
                let width = cx.box_model().width;
                self.held = Some(cx.add_constraint(constraint(
                    width,
                    RelationalOperator::GreaterOrEqual,
                    1.0,
                    strength::REQUIRED,
                )));
            }
        }
    }
}

fn button() -> ButtonWidget<MonospaceText> {
    ButtonWidget::new(MonospaceText::new("ok"), || {})
}

fn tab(window: &mut TestWindow) {
    window.handle_keyboard_event(KeyboardEvent::key(KeyCode::Tab));
}

fn shift_tab(window: &mut TestWindow) {
    window.handle_keyboard_event(KeyboardEvent::Key(
        KeyPress::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT),
    ));
}

fn focused(window: &TestWindow, id: WidgetId) -> bool {
    window.tree().core(id).unwrap().focus()
}

#[test]
fn extent_limits_follow_widget_minimum() {
    let mut window = window();
    window
        .add_widget(Tile::at_least(100.0, 50.0), Alignment::TOP_LEFT)
        .unwrap();
    presented(&mut window);

    assert_eq!(window.minimum_extent(), Extent::new(100.0, 50.0));
    let sentinel = u32::MAX as f32;
    assert_eq!(window.maximum_extent(), Extent::new(sentinel, sentinel));
    assert_eq!(window.current_extent(), Extent::new(200.0, 100.0));
    assert!(window.platform().size_requests.is_empty());
}

#[test]
fn current_extent_is_clamped_to_new_minimum() {
    let mut window = window_with(WindowConfig::default().with_extent(Extent::new(300.0, 30.0)));
    window
        .add_widget(Tile::fixed(120.0, 40.0), Alignment::TOP_LEFT)
        .unwrap();
    // Clamping during layout loses the swapchain; nothing is presented
    // against the stale one.
    assert_eq!(
        window.render(TimePoint::MIN),
        RenderOutcome::NotReady(WindowState::SwapchainLost)
    );
    assert!(window.surface().frames().is_empty());
    assert_eq!(
        window.render(TimePoint::MIN),
        RenderOutcome::NotReady(WindowState::ReadyToRender)
    );
    assert_eq!(window.surface().swapchain_extent(), Some(Extent::new(300.0, 40.0)));
    presented(&mut window);
    assert_eq!(window.surface().frames().len(), 1);

    assert_eq!(window.minimum_extent(), Extent::new(120.0, 40.0));
    // The height was below the new minimum and was clamped.
    assert_eq!(window.current_extent(), Extent::new(300.0, 40.0));
    assert_eq!(
        window.platform().size_requests,
        vec![Extent::new(300.0, 40.0)]
    );
}

/// Asks for more room than the window has, without insisting on it.
struct Wide;

impl Widget for Wide {
    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        cx.set_preferred_extent(Extent::new(300.0, 20.0));
    }
}

#[test]
fn preferred_extent_does_not_grow_the_root() {
    let mut window = window();
    let wide = window.add_widget(Wide, Alignment::TOP_LEFT).unwrap();
    presented(&mut window);

    let root = window.tree().core(window.root()).unwrap().geometry().extent();
    assert_eq!(root, Extent::new(200.0, 100.0));
    assert_eq!(window.current_extent(), root);
    let child = window.tree().core(wide).unwrap().geometry().extent();
    assert!(child.width <= 200.0, "child overflowed: {child:?}");
    assert!(window.platform().size_requests.is_empty());
}

#[test]
fn window_constraint_add_and_remove_restore_limits() {
    let mut window = window();
    presented(&mut window);
    let (minimum, maximum) = (window.minimum_extent(), window.maximum_extent());

    let width = window.tree().core(window.root()).unwrap().box_model.width;
    let c = constraint(
        width,
        RelationalOperator::LessOrEqual,
        150.0,
        strength::REQUIRED,
    );
    window.add_constraint(c.clone());
    assert_eq!(window.maximum_extent().width, 150.0);
    assert_eq!(window.current_extent(), Extent::new(150.0, 100.0));

    window.remove_constraint(&c);
    assert_eq!(window.minimum_extent(), minimum);
    assert_eq!(window.maximum_extent(), maximum);
    assert!(window.try_remove_constraint(&c).is_err());
}

#[test]
fn conflicting_window_constraint_is_rejected() {
    let mut window = window();
    let width = window.tree().core(window.root()).unwrap().box_model.width;
    let negative = constraint(
        width,
        RelationalOperator::LessOrEqual,
        -1.0,
        strength::REQUIRED,
    );
    assert!(window.try_add_constraint(negative).is_err());
    assert_eq!(window.minimum_extent(), Extent::ZERO);
}

#[test]
fn mouse_targets_get_balanced_enter_and_exit() {
    let mut window = window();
    let first = Tile::fixed(20.0, 20.0);
    let first_seen = Arc::clone(&first.seen);
    let a = window.add_widget(first, Alignment::TOP_LEFT).unwrap();
    let second = Tile::fixed(20.0, 20.0);
    let second_seen = Arc::clone(&second.seen);
    let b = window.add_widget(second, Alignment::BOTTOM_RIGHT).unwrap();
    presented(&mut window);

    window.handle_mouse_event(MouseEvent::moved(Point::new(5.0, 95.0)));
    assert_eq!(window.mouse_target(), Some(a));
    assert!(window.tree().core(a).unwrap().hover());

    window.handle_mouse_event(MouseEvent::moved(Point::new(195.0, 5.0)));
    assert_eq!(window.mouse_target(), Some(b));
    assert!(!window.tree().core(a).unwrap().hover());

    window.handle_mouse_event(MouseEvent::exited(Point::new(250.0, 5.0)));
    assert_eq!(window.mouse_target(), None);

    use MouseEventKind::{Entered, Exited, Move};
    assert_eq!(*first_seen.lock().unwrap(), [Entered, Move, Exited]);
    assert_eq!(*second_seen.lock().unwrap(), [Entered, Move, Exited]);
}

#[test]
fn hit_box_test_finds_widget_under_point() {
    let mut window = window();
    let tile = Tile::fixed(20.0, 20.0);
    let id = window.add_widget(tile, Alignment::BOTTOM_RIGHT).unwrap();
    presented(&mut window);
    assert_eq!(
        window.hit_box_test(Point::new(185.0, 7.0)).widget,
        Some(id)
    );
    assert_eq!(window.hit_box_test(Point::new(-1.0, 7.0)).widget, None);
}

#[test]
fn cursor_is_only_sent_when_it_changes() {
    let mut window = window();
    let ok = window.add_widget(button(), Alignment::BOTTOM_RIGHT).unwrap();
    presented(&mut window);
    let rect = window.tree().core(ok).unwrap().geometry().window_rectangle();
    let on_button = Point::new(rect.x + 1.0, rect.y + 1.0);

    window.handle_mouse_event(MouseEvent::moved(Point::new(1.0, 99.0)));
    window.handle_mouse_event(MouseEvent::moved(Point::new(2.0, 98.0)));
    window.handle_mouse_event(MouseEvent::moved(on_button));
    window.handle_mouse_event(MouseEvent::moved(on_button));
    window.handle_mouse_event(MouseEvent::exited(on_button));

    assert_eq!(
        window.platform().cursors,
        [Cursor::Default, Cursor::Button, Cursor::None]
    );
}

#[test]
fn tab_walks_focusable_widgets_and_wraps() {
    let mut window = window();
    let a = window.add_widget(button(), Alignment::TOP_LEFT).unwrap();
    let _b = window
        .add_widget(LabelWidget::new(MonospaceText::new("b")), Alignment::MIDDLE_CENTER)
        .unwrap();
    let c = window.add_widget(button(), Alignment::BOTTOM_RIGHT).unwrap();
    presented(&mut window);

    tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(a));
    assert!(focused(&window, a));

    tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(c));
    assert!(!focused(&window, a));
    assert!(focused(&window, c));

    tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(a));

    shift_tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(c));
    shift_tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(a));
}

#[test]
fn click_focuses_and_enter_activates() {
    let clicks = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&clicks);
    let mut window = window();
    let ok = window
        .add_widget(
            ButtonWidget::new(MonospaceText::new("ok"), move || {
                *counter.lock().unwrap() += 1;
            }),
            Alignment::MIDDLE_CENTER,
        )
        .unwrap();
    presented(&mut window);
    let rect = window.tree().core(ok).unwrap().geometry().window_rectangle();
    let inside = Point::new(rect.x + 1.0, rect.y + 1.0);

    window.handle_mouse_event(MouseEvent::pressed(MouseButtons::LEFT, inside));
    assert_eq!(window.keyboard_target(), Some(ok));
    window.handle_mouse_event(MouseEvent::released(MouseButtons::LEFT, inside));
    assert_eq!(*clicks.lock().unwrap(), 1);

    assert!(window.handle_keyboard_event(KeyboardEvent::key(KeyCode::Enter)));
    assert_eq!(*clicks.lock().unwrap(), 2);

    // Clicking the background drops focus.
    window.handle_mouse_event(MouseEvent::pressed(MouseButtons::LEFT, Point::new(1.0, 1.0)));
    assert_eq!(window.keyboard_target(), None);
    assert!(!focused(&window, ok));
}

#[test]
fn escape_clears_focus() {
    let mut window = window();
    let a = window.add_widget(button(), Alignment::TOP_LEFT).unwrap();
    presented(&mut window);
    tab(&mut window);
    assert_eq!(window.keyboard_target(), Some(a));
    assert!(window.handle_keyboard_event(KeyboardEvent::key(KeyCode::Escape)));
    assert_eq!(window.keyboard_target(), None);
    assert!(!window.handle_keyboard_event(KeyboardEvent::key(KeyCode::Escape)));
}

#[test]
fn window_focus_events_toggle_active() {
    let mut window = window();
    presented(&mut window);
    assert!(window.tree().window_active());

    window.handle_keyboard_event(KeyboardEvent::Exited);
    assert!(!window.tree().window_active());
    presented(&mut window);

    window.handle_keyboard_event(KeyboardEvent::Entered);
    assert!(window.tree().window_active());
}

#[test]
fn removing_targets_clears_them() {
    let mut window = window();
    let a = window.add_widget(button(), Alignment::TOP_LEFT).unwrap();
    presented(&mut window);
    let rect = window.tree().core(a).unwrap().geometry().window_rectangle();
    window.handle_mouse_event(MouseEvent::pressed(
        MouseButtons::LEFT,
        Point::new(rect.x + 1.0, rect.y + 1.0),
    ));
    assert_eq!(window.mouse_target(), Some(a));
    assert_eq!(window.keyboard_target(), Some(a));

    window.remove_widget(a).unwrap();
    assert_eq!(window.mouse_target(), None);
    assert_eq!(window.keyboard_target(), None);
    assert!(window.remove_widget(window.root()).is_err());
    presented(&mut window);
}

#[test]
fn removing_a_widget_drops_window_constraints_on_it() {
    let mut window = window();
    let outer = window
        .add_widget(Tile::at_least(10.0, 10.0), Alignment::TOP_LEFT)
        .unwrap();
    presented(&mut window);

    let width = window.tree().core(outer).unwrap().box_model.width;
    let root_width = window.tree().core(window.root()).unwrap().box_model.width;
    let on_child = constraint(width, RelationalOperator::LessOrEqual, 80.0, strength::REQUIRED);
    let on_root = constraint(
        root_width,
        RelationalOperator::LessOrEqual,
        400.0,
        strength::REQUIRED,
    );
    window.add_constraint(on_child.clone());
    window.add_constraint(on_root.clone());

    window.remove_widget(outer).unwrap();
    assert!(!window.tree().solver().has_constraint(&on_child));
    assert!(window.try_remove_constraint(&on_child).is_err());
    assert!(window.tree().solver().has_constraint(&on_root));
    assert_eq!(window.maximum_extent().width, 400.0);
    presented(&mut window);
}

#[test]
fn restless_layout_gives_up_and_still_presents() {
    let mut window = window_with(
        WindowConfig::default()
            .with_extent(Extent::new(200.0, 100.0))
            .with_layout_retries(3),
    );
    window
        .add_widget(Restless::default(), Alignment::TOP_LEFT)
        .unwrap();
    presented(&mut window);
    assert_eq!(
        window.last_layout_error(),
        Some(LayoutError::DidNotConverge { retries: 3 })
    );
}

#[test]
fn settled_layout_reports_no_error() {
    let mut window = window();
    window
        .add_widget(LabelWidget::new(MonospaceText::new("calm")), Alignment::TOP_LEFT)
        .unwrap();
    presented(&mut window);
    assert_eq!(window.last_layout_error(), None);
}

#[test]
fn jobs_from_other_threads_run_before_the_frame() {
    let mut window = window();
    presented(&mut window);
    let before = window.tree().len();
    let root = window.root();

    let handle = window.handle();
    thread::spawn(move || {
        handle
            .run_on_frame(move |tree| {
                tree.add_widget(root, LabelWidget::new(MonospaceText::new("late")), Alignment::TOP_LEFT)
                    .unwrap();
            })
            .unwrap();
    })
    .join()
    .unwrap();

    assert!(window.next_wakeup().is_some());
    presented(&mut window);
    assert_eq!(window.tree().len(), before + 1);
}

#[test]
fn scheduled_redraw_waits_for_deadline() {
    let mut window = window();
    presented(&mut window);
    assert_eq!(window.next_wakeup(), None);

    let at = TimePoint::from_millis(40);
    window.handle().schedule_redraw(at);
    assert_eq!(window.next_wakeup(), Some(at));
    assert_eq!(
        window.render(TimePoint::from_millis(39)),
        RenderOutcome::Idle
    );
    assert!(matches!(
        window.render(at),
        RenderOutcome::Presented { .. }
    ));
    assert_eq!(window.next_wakeup(), None);
}

#[test]
fn minimize_and_maximize_reach_the_platform() {
    let mut window = window();
    window.minimize_window();
    window.maximize_window();
    window.maximize_window();
    assert_eq!(window.platform().minimized, 1);
    assert_eq!(window.platform().maximized, 2);
}

#[test]
fn zero_extent_window_waits_for_a_swapchain() {
    let mut window = Window::new(
        WindowConfig::default().with_extent(Extent::ZERO),
        HeadlessSurface::new(),
        RecordingPlatform::new(),
        Arc::new(DefaultTheme::compact()),
        KeybindingTable::default(),
    )
    .unwrap();
    assert_eq!(
        window.render(TimePoint::MIN),
        RenderOutcome::NotReady(WindowState::NoSwapchain)
    );
    window.window_changed_size(Extent::new(64.0, 48.0));
    assert_eq!(
        window.render(TimePoint::MIN),
        RenderOutcome::NotReady(WindowState::ReadyToRender)
    );
}
