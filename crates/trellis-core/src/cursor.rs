#![forbid(unsafe_code)]

//! Mouse cursor shapes requested from the platform.

/// The shape the platform should show for the mouse cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// No cursor change has been requested yet.
    #[default]
    None,
    /// The regular arrow.
    Default,
    /// Pointing hand over clickable widgets.
    Button,
    /// I-beam over editable text.
    TextEdit,
    /// Four-way arrow over a window move area.
    Move,
    /// Left/right arrow over a vertical resize border.
    ResizeHorizontal,
    /// Up/down arrow over a horizontal resize border.
    ResizeVertical,
}
