#![forbid(unsafe_code)]

//! Translation of physical key presses into abstract commands.
//!
//! A [`KeybindingTable`] is owned by the application and handed to each
//! window, so tests can install their own bindings.
//!
//! # Example
//!
//! ```
//! use trellis_core::event::{KeyCode, KeyPress, Modifiers};
//! use trellis_core::keybinding::{Command, KeybindingTable};
//!
//! let mut table = KeybindingTable::default();
//! table.bind(KeyPress::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL),
//!     Command::Custom("quit"));
//!
//! let tab = KeyPress::new(KeyCode::Tab);
//! assert_eq!(table.translate(&tab), &[Command::WidgetNext]);
//! ```

use std::collections::HashMap;

use crate::event::{KeyCode, KeyPress, Modifiers};

/// Abstract commands dispatched to widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move keyboard focus to the next widget in the focus chain.
    WidgetNext,
    /// Move keyboard focus to the previous widget in the focus chain.
    WidgetPrev,
    /// Activate the focused widget (press a button, toggle a checkbox).
    Activate,
    /// Abandon the current interaction.
    Cancel,
    /// Application-defined command.
    Custom(&'static str),
}

/// Key press to command mapping.
#[derive(Debug, Clone)]
pub struct KeybindingTable {
    bindings: HashMap<KeyPress, Vec<Command>>,
}

impl KeybindingTable {
    /// A table with no bindings at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Append `command` to the commands bound to `key`.
    pub fn bind(&mut self, key: KeyPress, command: Command) -> &mut Self {
        let commands = self.bindings.entry(key).or_default();
        if !commands.contains(&command) {
            commands.push(command);
        }
        self
    }

    /// Remove every command bound to `key`.
    pub fn unbind(&mut self, key: &KeyPress) -> &mut Self {
        self.bindings.remove(key);
        self
    }

    /// Commands bound to `key`, in binding order. Empty if unbound.
    #[must_use]
    pub fn translate(&self, key: &KeyPress) -> &[Command] {
        self.bindings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for KeybindingTable {
    /// Tab/Shift-Tab navigation, Enter/Space activation, Escape cancel.
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .bind(KeyPress::new(KeyCode::Tab), Command::WidgetNext)
            .bind(
                KeyPress::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT),
                Command::WidgetPrev,
            )
            .bind(KeyPress::new(KeyCode::BackTab), Command::WidgetPrev)
            .bind(
                KeyPress::new(KeyCode::BackTab).with_modifiers(Modifiers::SHIFT),
                Command::WidgetPrev,
            )
            .bind(KeyPress::new(KeyCode::Enter), Command::Activate)
            .bind(KeyPress::new(KeyCode::Char(' ')), Command::Activate)
            .bind(KeyPress::new(KeyCode::Escape), Command::Cancel);
        table
    }
}
