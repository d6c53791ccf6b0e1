#![forbid(unsafe_code)]

//! A clickable, focusable button with a text label.

use trellis_core::event::{MouseButtons, MouseEvent, MouseEventKind};
use trellis_core::geometry::{Extent, Point};
use trellis_core::keybinding::Command;
use trellis_core::time::TimePoint;

use crate::base::WidgetCore;
use crate::context::{EventContext, LayoutContext};
use crate::draw::DrawContext;
use crate::hitbox::HitBoxKind;
use crate::label::text_origin;
use crate::observable::Observable;
use crate::text::ShapedText;
use crate::{Needs, Widget};

/// Calls `on_activate` when clicked or when it receives
/// [`Command::Activate`] while focused.
///
/// A click activates only if the left button is released inside the
/// button after being pressed inside it.
pub struct ButtonWidget<T> {
    label: Observable<T>,
    laid_out_version: u64,
    pressed: bool,
    on_activate: Box<dyn FnMut()>,
}

impl<T: ShapedText> ButtonWidget<T> {
    #[must_use]
    pub fn new(label: T, on_activate: impl FnMut() + 'static) -> Self {
        Self::observing(Observable::new(label), on_activate)
    }

    #[must_use]
    pub fn observing(label: Observable<T>, on_activate: impl FnMut() + 'static) -> Self {
        Self {
            label,
            laid_out_version: 0,
            pressed: false,
            on_activate: Box::new(on_activate),
        }
    }

    pub fn label(&self) -> &Observable<T> {
        &self.label
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn activate(&mut self, cx: &mut EventContext<'_>) {
        trellis_core::debug!(widget = %cx.id(), "button activated");
        (self.on_activate)();
        cx.request_redraw();
    }
}

impl<T: ShapedText> Widget for ButtonWidget<T> {
    fn name(&self) -> &'static str {
        "button"
    }

    fn accepts_focus(&self) -> bool {
        true
    }

    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        self.label.subscribe(&cx.trigger());
    }

    fn needs(&self, _core: &WidgetCore, _now: TimePoint) -> Needs {
        if self.label.version() == self.laid_out_version {
            Needs::empty()
        } else {
            Needs::LAYOUT | Needs::REDRAW
        }
    }

    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        let version = self.label.version();
        let inset = 2.0 * cx.theme().margin();
        let grow = |e: Extent| Extent::new(e.width + inset, e.height + inset);
        let (minimum, preferred) = self
            .label
            .with(|text| (grow(text.minimum_extent()), grow(text.preferred_extent())));
        cx.set_minimum_extent(minimum);
        cx.set_preferred_extent(preferred);
        self.laid_out_version = version;
    }

    fn draw(&self, cx: &mut DrawContext<'_>) {
        let rect = cx.rectangle();
        let fill = if self.pressed {
            cx.accent_color()
        } else {
            cx.background_color()
        };
        let border = cx.focus_color();
        let (width, radius) = (cx.theme().border_width(), cx.theme().rounding_radius());
        cx.draw_box(rect, fill, border, width, radius);

        let margin = cx.theme().margin();
        let color = cx.label_color();
        self.label.with(|text| {
            let extent = text.preferred_extent();
            let mut origin = text_origin(rect, extent.height);
            origin.x += ((rect.width - extent.width) / 2.0).max(margin);
            cx.draw_text(text, origin, color);
        });
    }

    fn hit_box_kind(&self, _core: &WidgetCore, _position: Point) -> HitBoxKind {
        HitBoxKind::Button
    }

    fn handle_mouse_event(&mut self, cx: &mut EventContext<'_>, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::ButtonDown(buttons) if buttons.contains(MouseButtons::LEFT) => {
                self.pressed = true;
                cx.request_redraw();
                true
            }
            MouseEventKind::ButtonUp(buttons) if buttons.contains(MouseButtons::LEFT) => {
                let inside = cx.rectangle().contains(event.position);
                let was_pressed = std::mem::replace(&mut self.pressed, false);
                if was_pressed && inside && cx.core().enabled() {
                    self.activate(cx);
                }
                cx.request_redraw();
                true
            }
            MouseEventKind::Exited if self.pressed => {
                self.pressed = false;
                cx.request_redraw();
                false
            }
            _ => false,
        }
    }

    fn handle_command(&mut self, cx: &mut EventContext<'_>, command: Command) -> bool {
        if command == Command::Activate && cx.core().enabled() {
            self.activate(cx);
            true
        } else {
            false
        }
    }
}
