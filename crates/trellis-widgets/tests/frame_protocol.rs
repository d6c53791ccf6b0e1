#![forbid(unsafe_code)]

//! End-to-end tests of the frame protocol on a real widget tree.
//!
//! The tree is sized by suggesting the root extent to the solver, the way a
//! window does, then driven through layout, snapshot and draw.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use trellis_core::event::{KeyCode, KeyboardEvent, MouseButtons, MouseEvent};
use trellis_core::geometry::{Extent, Point, Rect};
use trellis_core::keybinding::KeybindingTable;
use trellis_core::time::TimePoint;
use trellis_core::trigger::Trigger;
use trellis_layout::Alignment;
use trellis_widgets::{
    Backing, BackingError, ButtonWidget, DefaultTheme, DrawBuffers, HitBoxKind, ImageHandle,
    ImageWidget, LabelWidget, MonospaceText, Needs, Observable, WidgetId, WidgetTree,
    WindowWidget,
};

fn window(width: f64, height: f64) -> (WidgetTree, WidgetId) {
    let mut tree = WidgetTree::new(Arc::new(DefaultTheme::compact()), Arc::new(Trigger::new()));
    let root = tree.set_root(WindowWidget::new("test")).unwrap();
    let (w, h) = {
        let bm = &tree.core(root).unwrap().box_model;
        (bm.width, bm.height)
    };
    tree.solver_mut().suggest(w, width).unwrap();
    tree.solver_mut().suggest(h, height).unwrap();
    (tree, root)
}

fn frame(tree: &mut WidgetTree, now: TimePoint) -> DrawBuffers {
    tree.layout_pass(now, false);
    tree.snapshot_geometry();
    let mut buffers = DrawBuffers::new();
    tree.draw(&mut buffers, now);
    buffers
}

fn rect_of(tree: &WidgetTree, id: WidgetId) -> Rect {
    tree.core(id).unwrap().geometry().window_rectangle()
}

#[test]
fn label_is_placed_top_left_of_content() {
    let (mut tree, root) = window(200.0, 100.0);
    let label = tree
        .add_widget(root, LabelWidget::new(MonospaceText::new("hello")), Alignment::TOP_LEFT)
        .unwrap();
    frame(&mut tree, TimePoint::MIN);

    assert_eq!(rect_of(&tree, root), Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(rect_of(&tree, label), Rect::new(0.0, 84.0, 40.0, 16.0));
    let content = tree.content(root).unwrap();
    assert_eq!(tree.parent(label), Some(content));
    assert_eq!(
        tree.core(label).unwrap().geometry().offset_from_parent(),
        Point::new(0.0, 84.0)
    );
}

#[test]
fn second_needs_reports_no_new_work() {
    let (mut tree, root) = window(200.0, 100.0);
    let label = tree
        .add_widget(root, LabelWidget::new(MonospaceText::new("x")), Alignment::MIDDLE_CENTER)
        .unwrap();
    frame(&mut tree, TimePoint::MIN);
    assert_eq!(tree.needs(label, TimePoint::MIN), Needs::empty());

    tree.core(label).unwrap().trigger().fire();
    assert_eq!(tree.needs(label, TimePoint::MIN), Needs::REDRAW);
    assert_eq!(tree.needs(label, TimePoint::MIN), Needs::empty());
}

#[test]
fn future_deadline_waits_for_its_frame() {
    let (mut tree, root) = window(200.0, 100.0);
    let label = tree
        .add_widget(root, LabelWidget::new(MonospaceText::new("x")), Alignment::MIDDLE_CENTER)
        .unwrap();
    frame(&mut tree, TimePoint::MIN);

    let later = TimePoint::from_millis(16);
    tree.core(label).unwrap().trigger().schedule(later);
    assert_eq!(tree.pending_trigger(), Some((later, 1)));
    assert_eq!(tree.needs(label, TimePoint::from_millis(15)), Needs::empty());
    assert_eq!(tree.needs(label, later), Needs::REDRAW);
    assert_eq!(tree.pending_trigger(), None);
}

#[test]
fn text_change_relayouts_label() {
    let (mut tree, root) = window(200.0, 100.0);
    let text = Observable::new(MonospaceText::new("hello"));
    let label = tree
        .add_widget(root, LabelWidget::observing(text.clone()), Alignment::TOP_LEFT)
        .unwrap();
    frame(&mut tree, TimePoint::MIN);

    text.set(MonospaceText::new("hello world"));
    assert!(tree.window_trigger().is_pending());
    let done = tree.layout_pass(TimePoint::MIN, false);
    assert!(done.contains(Needs::LAYOUT));
    tree.snapshot_geometry();
    // Minimum height is two lines; preferred width is the single line.
    assert_eq!(rect_of(&tree, label), Rect::new(0.0, 68.0, 88.0, 32.0));
}

#[test]
fn hit_test_prefers_deeper_widgets() {
    let (mut tree, root) = window(200.0, 100.0);
    let button = tree
        .add_widget(
            root,
            ButtonWidget::new(MonospaceText::new("ok"), || {}),
            Alignment::BOTTOM_RIGHT,
        )
        .unwrap();
    frame(&mut tree, TimePoint::MIN);

    let rect = rect_of(&tree, button);
    assert_eq!(rect.right(), 200.0);
    assert_eq!(rect.bottom(), 0.0);
    let inside = Point::new(rect.x + 1.0, rect.y + 1.0);
    let hit = tree.hit_box_test(inside);
    assert_eq!(hit.widget, Some(button));
    assert_eq!(hit.kind, HitBoxKind::Button);

    let background = tree.hit_box_test(Point::new(1.0, 99.0));
    assert_eq!(background.widget, tree.content(root));
    assert_eq!(background.kind, HitBoxKind::Default);

    assert_eq!(tree.hit_box_test(Point::new(500.0, 500.0)).widget, None);

    tree.set_enabled(button, false);
    assert_eq!(tree.hit_box_test(inside).kind, HitBoxKind::Default);
}

#[test]
fn button_activates_on_click_and_command() {
    let (mut tree, root) = window(200.0, 100.0);
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let button = tree
        .add_widget(
            root,
            ButtonWidget::new(MonospaceText::new("go"), move || counter.set(counter.get() + 1)),
            Alignment::MIDDLE_CENTER,
        )
        .unwrap();
    frame(&mut tree, TimePoint::MIN);

    let center = {
        let r = rect_of(&tree, button);
        Point::new(r.x + r.width / 2.0, r.y + r.height / 2.0)
    };
    tree.handle_mouse_event(button, &MouseEvent::pressed(MouseButtons::LEFT, center));
    tree.handle_mouse_event(button, &MouseEvent::released(MouseButtons::LEFT, center));
    assert_eq!(count.get(), 1);

    // Released outside: no activation.
    tree.handle_mouse_event(button, &MouseEvent::pressed(MouseButtons::LEFT, center));
    tree.handle_mouse_event(
        button,
        &MouseEvent::released(MouseButtons::LEFT, Point::new(-50.0, -50.0)),
    );
    assert_eq!(count.get(), 1);

    let unhandled = tree.handle_keyboard_event(
        button,
        &KeyboardEvent::key(KeyCode::Enter),
        &KeybindingTable::default(),
    );
    assert!(unhandled.is_empty());
    assert_eq!(count.get(), 2);
}

#[test]
fn image_draws_nothing_until_ready() {
    let (mut tree, root) = window(200.0, 100.0);
    let (backing, promise) = Backing::pending();
    let image = tree
        .add_widget(root, ImageWidget::new(backing), Alignment::TOP_LEFT)
        .unwrap();
    let buffers = frame(&mut tree, TimePoint::MIN);
    assert!(buffers.images.is_empty());
    assert_eq!(tree.needs(image, TimePoint::MIN), Needs::empty());

    promise.fulfil(Ok(ImageHandle {
        texture: 3,
        extent: Extent::new(32.0, 24.0),
    }));
    assert!(tree.needs(image, TimePoint::MIN).contains(Needs::LAYOUT));
    let buffers = frame(&mut tree, TimePoint::MIN);
    assert_eq!(buffers.images.len(), 4);
    assert_eq!(rect_of(&tree, image).extent(), Extent::new(32.0, 24.0));
}

#[test]
fn failed_image_draws_placeholder_and_keeps_siblings() {
    let (mut tree, root) = window(200.0, 100.0);
    let (backing, promise) = Backing::<ImageHandle>::pending();
    tree.add_widget(root, ImageWidget::new(backing), Alignment::TOP_LEFT)
        .unwrap();
    tree.add_widget(root, LabelWidget::new(MonospaceText::new("still here")), Alignment::BOTTOM_LEFT)
        .unwrap();
    promise.fulfil(Err(BackingError::Failed("truncated file".into())));

    let buffers = frame(&mut tree, TimePoint::MIN);
    assert!(buffers.images.is_empty());
    assert!(!buffers.sdf.is_empty());
    // Only the placeholder draws a rounded box.
    assert_eq!(buffers.boxes.len(), 4);
}

#[test]
fn removing_a_widget_restores_the_solver() {
    let (mut tree, root) = window(200.0, 100.0);
    let before = tree.len();
    let label = tree
        .add_widget(root, LabelWidget::new(MonospaceText::new("gone")), Alignment::MIDDLE_CENTER)
        .unwrap();
    frame(&mut tree, TimePoint::MIN);
    tree.remove_widget(label).unwrap();
    assert_eq!(tree.len(), before);
    assert!(tree.core(label).is_none());
    frame(&mut tree, TimePoint::MIN);
    assert_eq!(rect_of(&tree, root), Rect::new(0.0, 0.0, 200.0, 100.0));
}
