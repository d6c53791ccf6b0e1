#![forbid(unsafe_code)]

//! Event dispatch into individual widgets.
//!
//! The window decides which widget receives an event; these methods do the
//! per-widget part: shared state (hover, focus) first, then the widget's
//! own handler.

use trellis_core::event::{KeyboardEvent, MouseEvent, MouseEventKind};
use trellis_core::keybinding::{Command, KeybindingTable};

use crate::Widget;
use crate::context::EventContext;
use crate::id::WidgetId;
use crate::tree::WidgetTree;

impl WidgetTree {
    fn dispatch(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut EventContext<'_>) -> bool,
    ) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let Some(widget) = node.widget.as_deref_mut() else {
            return false;
        };
        let mut cx = EventContext::new(id, &mut node.core);
        f(widget, &mut cx)
    }

    /// Deliver a mouse event given in window coordinates to `id`.
    ///
    /// Entered and Exited toggle hover and repaint before the widget sees
    /// them. The widget receives the event in its local coordinates.
    pub fn handle_mouse_event(&mut self, id: WidgetId, event: &MouseEvent) -> bool {
        let Some(core) = self.core_mut(id) else {
            return false;
        };
        match event.kind {
            MouseEventKind::Entered => {
                core.hover = true;
                core.request_redraw();
            }
            MouseEventKind::Exited => {
                core.hover = false;
                core.request_redraw();
            }
            _ => {}
        }
        let local = event.localized(core.geometry().offset_from_window());
        self.dispatch(id, |widget, cx| widget.handle_mouse_event(cx, &local))
    }

    /// Deliver a keyboard event to `id`.
    ///
    /// Key presses are translated through `bindings`; each command is
    /// offered to `id` and then its ancestors. Commands nobody handled are
    /// returned for window-level handling.
    pub fn handle_keyboard_event(
        &mut self,
        id: WidgetId,
        event: &KeyboardEvent,
        bindings: &KeybindingTable,
    ) -> Vec<Command> {
        match event {
            KeyboardEvent::Entered | KeyboardEvent::Exited => {
                if let Some(core) = self.core_mut(id) {
                    core.focus = matches!(event, KeyboardEvent::Entered);
                    core.request_redraw();
                }
                Vec::new()
            }
            KeyboardEvent::Key(press) => bindings
                .translate(press)
                .iter()
                .copied()
                .filter(|&command| !self.handle_command(id, command))
                .collect(),
            KeyboardEvent::Grapheme(grapheme) => {
                let grapheme = *grapheme;
                self.dispatch(id, |widget, cx| widget.handle_grapheme(cx, grapheme));
                Vec::new()
            }
        }
    }

    /// Offer `command` to `id`, then to each ancestor until one accepts.
    pub fn handle_command(&mut self, id: WidgetId, command: Command) -> bool {
        let mut current = Some(id);
        while let Some(target) = current {
            if self.dispatch(target, |widget, cx| widget.handle_command(cx, command)) {
                trellis_core::trace!(widget = %target, ?command, "command handled");
                return true;
            }
            current = self.parent(target);
        }
        false
    }
}
