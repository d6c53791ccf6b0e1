#![forbid(unsafe_code)]

//! The root widget of every window.
//!
//! It paints the window background and owns a content container that fills
//! its padded area; widgets added to the root land in that container.

use trellis_core::geometry::{Point, Sides};
use trellis_layout::Alignment;

use crate::container::ContainerWidget;
use crate::context::LayoutContext;
use crate::draw::DrawContext;
use crate::hitbox::HitBoxKind;
use crate::id::WidgetId;
use crate::theme::Theme;
use crate::{Widget, WidgetCore};

pub struct WindowWidget {
    title: String,
    content: Option<WidgetId>,
}

impl WindowWidget {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The container receiving user widgets, once initialised.
    pub fn content(&self) -> Option<WidgetId> {
        self.content
    }
}

impl Widget for WindowWidget {
    fn name(&self) -> &'static str {
        "window"
    }

    fn margin(&self, _theme: &dyn Theme) -> Sides {
        Sides::ZERO
    }

    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        let content = cx.add_widget(
            ContainerWidget::new().with_margin(Sides::ZERO),
            Alignment::TOP_LEFT,
        );
        cx.set_content(content);

        let root = cx.id();
        let margin = cx.margin();
        let edges = match (cx.box_model_of(content), cx.box_model_of(root)) {
            (Some(inner), Some(outer)) => [
                inner.place_left(outer, margin.left),
                inner.place_right(outer, margin.right),
                inner.place_at_bottom(outer, margin.bottom),
                inner.place_at_top(outer, margin.top),
            ],
            _ => return,
        };
        for c in edges {
            cx.add_constraint(c);
        }
        self.content = Some(content);
    }

    fn hit_box_kind(&self, _core: &WidgetCore, _position: Point) -> HitBoxKind {
        HitBoxKind::Default
    }

    fn draw(&self, cx: &mut DrawContext<'_>) {
        let rect = cx.rectangle();
        let color = cx.theme().window_background();
        cx.draw_filled_quad(rect, color);
    }
}
