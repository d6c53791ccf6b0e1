#![forbid(unsafe_code)]

//! A plain grouping widget.

use trellis_core::geometry::Sides;

use crate::draw::DrawContext;
use crate::theme::{Color, Theme};
use crate::Widget;

/// Groups children, optionally over a solid background.
///
/// Margin defaults to the theme margin and padding to none; both can be
/// overridden before the container is added to the tree.
#[derive(Debug, Clone, Default)]
pub struct ContainerWidget {
    background: Option<Color>,
    margin: Option<Sides>,
    padding: Option<Sides>,
}

impl ContainerWidget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Sides) -> Self {
        self.margin = Some(margin);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Sides) -> Self {
        self.padding = Some(padding);
        self
    }
}

impl Widget for ContainerWidget {
    fn name(&self) -> &'static str {
        "container"
    }

    fn margin(&self, theme: &dyn Theme) -> Sides {
        self.margin.unwrap_or_else(|| Sides::all(theme.margin()))
    }

    fn padding(&self, _theme: &dyn Theme) -> Sides {
        self.padding.unwrap_or(Sides::ZERO)
    }

    fn draw(&self, cx: &mut DrawContext<'_>) {
        if let Some(color) = self.background {
            let rect = cx.rectangle();
            cx.draw_filled_quad(rect, color);
        }
    }
}
