#![forbid(unsafe_code)]

//! Static or observed text.

use trellis_core::geometry::{Point, Rect};
use trellis_core::time::TimePoint;

use crate::base::WidgetCore;
use crate::context::LayoutContext;
use crate::draw::DrawContext;
use crate::observable::Observable;
use crate::text::ShapedText;
use crate::{Needs, Widget};

/// Where a block of text of `extent` starts inside `rect`: left aligned,
/// vertically centered.
pub(crate) fn text_origin(rect: Rect, text_height: f32) -> Point {
    Point::new(rect.x, rect.y + ((rect.height - text_height) / 2.0).max(0.0))
}

/// Shows shaped text; relayouts whenever the text changes.
pub struct LabelWidget<T> {
    text: Observable<T>,
    laid_out_version: u64,
}

impl<T: ShapedText> LabelWidget<T> {
    #[must_use]
    pub fn new(text: T) -> Self {
        Self::observing(Observable::new(text))
    }

    /// A label that follows `text`.
    #[must_use]
    pub fn observing(text: Observable<T>) -> Self {
        Self {
            text,
            laid_out_version: 0,
        }
    }

    pub fn text(&self) -> &Observable<T> {
        &self.text
    }
}

impl<T: ShapedText> Widget for LabelWidget<T> {
    fn name(&self) -> &'static str {
        "label"
    }

    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        self.text.subscribe(&cx.trigger());
    }

    fn needs(&self, _core: &WidgetCore, _now: TimePoint) -> Needs {
        if self.text.version() == self.laid_out_version {
            Needs::empty()
        } else {
            Needs::LAYOUT | Needs::REDRAW
        }
    }

    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        let version = self.text.version();
        let (minimum, preferred) = self
            .text
            .with(|text| (text.minimum_extent(), text.preferred_extent()));
        cx.set_minimum_extent(minimum);
        cx.set_preferred_extent(preferred);
        self.laid_out_version = version;
    }

    fn draw(&self, cx: &mut DrawContext<'_>) {
        let color = cx.label_color();
        let rect = cx.rectangle();
        self.text.with(|text| {
            let origin = text_origin(rect, text.preferred_extent().height);
            cx.draw_text(text, origin, color);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonospaceText;

    #[test]
    fn needs_follows_text_version() {
        let mut label = LabelWidget::new(MonospaceText::new("x"));
        let core = WidgetCore::new(
            trellis_layout::BoxModel::new(),
            std::sync::Arc::new(trellis_core::trigger::Trigger::new()),
            1,
        );
        assert!(label.needs(&core, TimePoint::MIN).contains(Needs::LAYOUT));
        label.laid_out_version = label.text.version();
        assert!(label.needs(&core, TimePoint::MIN).is_empty());
        label.text().set(MonospaceText::new("y"));
        assert!(label.needs(&core, TimePoint::MIN).contains(Needs::LAYOUT));
    }

    #[test]
    fn text_is_vertically_centered() {
        let origin = text_origin(Rect::new(0.0, 0.0, 100.0, 30.0), 16.0);
        assert_eq!(origin, Point::new(0.0, 7.0));
        let squeezed = text_origin(Rect::new(0.0, 0.0, 100.0, 10.0), 16.0);
        assert_eq!(squeezed.y, 0.0);
    }
}
