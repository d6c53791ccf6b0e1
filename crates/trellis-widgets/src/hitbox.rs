#![forbid(unsafe_code)]

//! Hit testing results.

use trellis_core::cursor::Cursor;

use crate::id::WidgetId;

/// What kind of area the pointer is over, in increasing priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HitBoxKind {
    /// Not over any widget.
    #[default]
    Outside,
    /// Over a widget with no special pointer behaviour.
    Default,
    /// Over a clickable widget.
    Button,
    /// Over editable text.
    TextEdit,
    /// Over an area that drags the window.
    MoveArea,
}

impl HitBoxKind {
    /// The cursor to show over this kind of area.
    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Outside => Cursor::None,
            Self::Default => Cursor::Default,
            Self::Button => Cursor::Button,
            Self::TextEdit => Cursor::TextEdit,
            Self::MoveArea => Cursor::Move,
        }
    }
}

/// The topmost widget under a point.
///
/// Candidates rank by presence of a widget, then elevation, then kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitBox {
    pub widget: Option<WidgetId>,
    pub elevation: u32,
    pub kind: HitBoxKind,
}

impl HitBox {
    /// No widget hit.
    pub const NONE: Self = Self {
        widget: None,
        elevation: 0,
        kind: HitBoxKind::Outside,
    };

    #[must_use]
    pub const fn new(widget: WidgetId, elevation: u32, kind: HitBoxKind) -> Self {
        Self {
            widget: Some(widget),
            elevation,
            kind,
        }
    }

    fn rank(&self) -> (bool, u32, HitBoxKind) {
        (self.widget.is_some(), self.elevation, self.kind)
    }

    /// Whether `self` should replace `other` as the current best candidate.
    ///
    /// Equal ranks replace, so among siblings the later drawn one wins.
    #[must_use]
    pub fn supersedes(&self, other: &HitBox) -> bool {
        self.rank() >= other.rank()
    }
}
