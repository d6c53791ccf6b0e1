#![forbid(unsafe_code)]

//! Mouse and keyboard events as seen by widgets.
//!
//! The platform layer translates OS input into these types. `Entered` and
//! `Exited` variants are synthesized by the window when the mouse or keyboard
//! target changes; platforms never produce them directly.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

bitflags! {
    /// Mouse buttons held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        const LEFT   = 0b001;
        const MIDDLE = 0b010;
        const RIGHT  = 0b100;
    }
}

/// What happened to the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseEventKind {
    /// The pointer moved onto the receiving widget.
    Entered,
    /// The pointer left the receiving widget.
    Exited,
    /// Movement with no buttons held.
    Move,
    /// Movement with at least one button held.
    Drag,
    /// A button was pressed.
    ButtonDown(MouseButtons),
    /// A button was released.
    ButtonUp(MouseButtons),
    /// Scroll wheel delta in pixels.
    Wheel { dx: f32, dy: f32 },
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Pointer position. Window coordinates when delivered to the window,
    /// widget-local coordinates when delivered to a widget.
    pub position: Point,
    /// Buttons held after this event.
    pub buttons: MouseButtons,
    pub modifiers: Modifiers,
    /// Consecutive clicks for `ButtonDown` (1 single, 2 double).
    pub click_count: u8,
}

impl MouseEvent {
    /// Create an event of the given kind at `position`.
    #[must_use]
    pub const fn new(kind: MouseEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            buttons: MouseButtons::empty(),
            modifiers: Modifiers::NONE,
            click_count: 0,
        }
    }

    /// Pointer movement to `position`.
    #[must_use]
    pub const fn moved(position: Point) -> Self {
        Self::new(MouseEventKind::Move, position)
    }

    /// A single click press of `button` at `position`.
    #[must_use]
    pub const fn pressed(button: MouseButtons, position: Point) -> Self {
        Self {
            kind: MouseEventKind::ButtonDown(button),
            position,
            buttons: button,
            modifiers: Modifiers::NONE,
            click_count: 1,
        }
    }

    /// Release of `button` at `position`.
    #[must_use]
    pub const fn released(button: MouseButtons, position: Point) -> Self {
        Self::new(MouseEventKind::ButtonUp(button), position)
    }

    /// Synthetic entry event.
    #[must_use]
    pub const fn entered(position: Point) -> Self {
        Self::new(MouseEventKind::Entered, position)
    }

    /// Synthetic exit event.
    #[must_use]
    pub const fn exited(position: Point) -> Self {
        Self::new(MouseEventKind::Exited, position)
    }

    /// Set modifier keys.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The same event with the position moved by `-origin`.
    #[must_use]
    pub fn localized(mut self, origin: Point) -> Self {
        self.position = self.position - origin;
        self
    }

    /// True for a left button press.
    #[must_use]
    pub fn is_left_press(&self) -> bool {
        matches!(self.kind, MouseEventKind::ButtonDown(b) if b.contains(MouseButtons::LEFT))
    }
}

/// Physical keys the keybinding table understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key, matched case-sensitively.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab as reported by some platforms.
    BackTab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key F1-F24.
    F(u8),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// A key press without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Set modifier keys.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// Keyboard focus moved onto the receiving widget.
    Entered,
    /// Keyboard focus left the receiving widget.
    Exited,
    /// A physical key was pressed; translated into commands by the
    /// keybinding table.
    Key(KeyPress),
    /// Text input, already composed by the platform.
    Grapheme(char),
}

impl KeyboardEvent {
    /// Shorthand for an unmodified key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyPress::new(code))
    }
}
