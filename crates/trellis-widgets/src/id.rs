#![forbid(unsafe_code)]

//! Widget identity.

use std::fmt;

/// A handle to a widget in a [`WidgetTree`](crate::WidgetTree).
///
/// Holds a slot index and a generation counter; a handle kept after its
/// widget was removed no longer resolves, even if the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl WidgetId {
    /// The raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({}@gen{})", self.idx, self.generation)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.idx, self.generation)
    }
}
