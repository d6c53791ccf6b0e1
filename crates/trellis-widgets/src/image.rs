#![forbid(unsafe_code)]

//! Images whose pixels arrive asynchronously.

use trellis_core::geometry::{Extent, Rect};
use trellis_core::time::TimePoint;

use crate::backing::{Backing, BackingState};
use crate::base::WidgetCore;
use crate::context::LayoutContext;
use crate::draw::DrawContext;
use crate::{Needs, Widget};

/// A texture uploaded to the image atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    /// Atlas layer holding the pixels.
    pub texture: u32,
    /// Natural size in pixels.
    pub extent: Extent,
}

/// Displays an image once its backing is ready.
///
/// While the backing is pending nothing is drawn. If it fails, a themed
/// placeholder box is drawn instead and the rest of the window is
/// unaffected.
pub struct ImageWidget {
    backing: Backing<ImageHandle>,
    placeholder: Extent,
    settled_in_layout: bool,
}

impl ImageWidget {
    #[must_use]
    pub fn new(backing: Backing<ImageHandle>) -> Self {
        Self {
            backing,
            placeholder: Self::PLACEHOLDER_EXTENT,
            settled_in_layout: false,
        }
    }

    /// Preferred size of the placeholder shown when loading fails.
    pub const PLACEHOLDER_EXTENT: Extent = Extent::new(16.0, 16.0);

    #[must_use]
    pub fn with_placeholder_extent(mut self, extent: Extent) -> Self {
        self.placeholder = extent;
        self
    }

    /// Whether a result has been picked up by layout.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.settled_in_layout
    }
}

impl Widget for ImageWidget {
    fn name(&self) -> &'static str {
        "image"
    }

    fn init(&mut self, cx: &mut LayoutContext<'_>) {
        self.backing.notify(&cx.trigger());
    }

    fn needs(&self, _core: &WidgetCore, _now: TimePoint) -> Needs {
        if self.backing.is_settled() && !self.settled_in_layout {
            Needs::LAYOUT | Needs::REDRAW
        } else {
            Needs::empty()
        }
    }

    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        if self.settled_in_layout {
            return;
        }
        match self.backing.state() {
            BackingState::Pending => {}
            BackingState::Ready(image) => {
                let extent = image.extent;
                cx.set_preferred_extent(extent);
                self.settled_in_layout = true;
            }
            BackingState::Failed(error) => {
                trellis_core::warn!(widget = %cx.id(), %error, "image backing failed");
                cx.set_preferred_extent(self.placeholder);
                self.settled_in_layout = true;
            }
        }
    }

    fn draw(&self, cx: &mut DrawContext<'_>) {
        let rect: Rect = cx.rectangle();
        match self.backing.state() {
            BackingState::Pending => {}
            BackingState::Ready(image) => cx.draw_image(rect, image),
            BackingState::Failed(_) => cx.draw_themed_box(rect),
        }
    }
}
