#![forbid(unsafe_code)]

//! Per-frame vertex buffers and the context widgets draw through.
//!
//! There is one append-only buffer per primitive kind: flat colored quads,
//! rounded boxes, images, and signed-distance-field glyphs. The GPU side
//! consumes them after the frame's draw pass; they are cleared at the start
//! of the next frame.
//!
//! Widgets draw in local coordinates. The context translates to window
//! coordinates and tags each vertex with a depth derived from elevation, so
//! nested widgets composite over their parents.

use trellis_core::geometry::{Point, Rect, Sides};
use trellis_core::time::TimePoint;

use crate::base::WidgetCore;
use crate::image::ImageHandle;
use crate::text::ShapedText;
use crate::theme::{self, Color, Theme};

/// Depth step per elevation level.
pub const ELEVATION_DEPTH: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxVertex {
    pub position: [f32; 3],
    pub clip: [f32; 4],
    /// Distance of this corner from each edge of the box, for the shader.
    pub corner: [f32; 4],
    pub fill: [f32; 4],
    pub border: [f32; 4],
    pub border_width: f32,
    pub corner_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageVertex {
    pub position: [f32; 3],
    pub clip: [f32; 4],
    /// Texture u, v and atlas layer.
    pub texture: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfVertex {
    pub position: [f32; 3],
    pub clip: [f32; 4],
    /// Glyph atlas coordinate: u, v and glyph index.
    pub texture: [f32; 3],
    pub color: [f32; 4],
}

/// The four vertex streams of one frame.
#[derive(Debug, Default)]
pub struct DrawBuffers {
    pub flat: Vec<FlatVertex>,
    pub boxes: Vec<BoxVertex>,
    pub images: Vec<ImageVertex>,
    pub sdf: Vec<SdfVertex>,
}

impl DrawBuffers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's vertices, keeping the allocations.
    pub fn clear(&mut self) {
        self.flat.clear();
        self.boxes.clear();
        self.images.clear();
        self.sdf.clear();
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.flat.len() + self.boxes.len() + self.images.len() + self.sdf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
}

fn corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.left(), rect.bottom()),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.left(), rect.top()),
        Point::new(rect.right(), rect.top()),
    ]
}

fn clip_array(rect: Rect) -> [f32; 4] {
    [rect.left(), rect.bottom(), rect.right(), rect.top()]
}

/// Drawing state for one widget.
pub struct DrawContext<'a> {
    buffers: &'a mut DrawBuffers,
    theme: &'a dyn Theme,
    core: &'a WidgetCore,
    window_active: bool,
    now: TimePoint,
    clip: Rect,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(
        buffers: &'a mut DrawBuffers,
        theme: &'a dyn Theme,
        core: &'a WidgetCore,
        window_active: bool,
        now: TimePoint,
    ) -> Self {
        let clip = core
            .geometry()
            .window_rectangle()
            .outer(Sides::all(theme.margin()));
        Self {
            buffers,
            theme,
            core,
            window_active,
            now,
            clip,
        }
    }

    #[inline]
    pub fn core(&self) -> &WidgetCore {
        self.core
    }

    #[inline]
    pub fn theme(&self) -> &dyn Theme {
        self.theme
    }

    /// The frame's display time.
    #[inline]
    pub fn now(&self) -> TimePoint {
        self.now
    }

    #[inline]
    pub fn window_active(&self) -> bool {
        self.window_active
    }

    /// The widget's rectangle in local coordinates.
    #[inline]
    pub fn rectangle(&self) -> Rect {
        self.core.geometry().rectangle()
    }

    /// Clipping rectangle in window coordinates.
    #[inline]
    pub fn clipping_rectangle(&self) -> Rect {
        self.clip
    }

    fn z(&self) -> f32 {
        self.core.elevation() as f32 * ELEVATION_DEPTH
    }

    fn to_window(&self, rect: Rect) -> Rect {
        rect.translate(self.core.geometry().offset_from_window())
    }

    // ── Colors ──────────────────────────────────────────────────────────

    pub fn background_color(&self) -> Color {
        theme::background_color(self.theme, self.core)
    }

    pub fn foreground_color(&self) -> Color {
        theme::foreground_color(self.theme, self.core)
    }

    pub fn focus_color(&self) -> Color {
        theme::focus_color(self.theme, self.core, self.window_active)
    }

    pub fn accent_color(&self) -> Color {
        theme::accent_color(self.theme, self.core, self.window_active)
    }

    pub fn label_color(&self) -> Color {
        theme::label_color(self.theme, self.core)
    }

    // ── Primitives ──────────────────────────────────────────────────────

    /// A solid quad, clipped on the CPU.
    pub fn draw_filled_quad(&mut self, rect: Rect, color: Color) {
        let rect = self.to_window(rect).intersection(&self.clip);
        if rect.is_empty() {
            return;
        }
        let z = self.z();
        let color = color.to_array();
        self.buffers
            .flat
            .extend(corners(rect).map(|p| FlatVertex {
                position: [p.x, p.y, z],
                color,
            }));
    }

    /// A rounded box with an inside border.
    pub fn draw_box(
        &mut self,
        rect: Rect,
        fill: Color,
        border: Color,
        border_width: f32,
        corner_radius: f32,
    ) {
        let rect = self.to_window(rect);
        if rect.is_empty() || rect.intersection(&self.clip).is_empty() {
            return;
        }
        let z = self.z();
        let clip = clip_array(self.clip);
        let (w, h) = (rect.width, rect.height);
        let distances = [[0.0, 0.0, w, h], [w, 0.0, 0.0, h], [0.0, h, w, 0.0], [w, h, 0.0, 0.0]];
        for (p, corner) in corners(rect).into_iter().zip(distances) {
            self.buffers.boxes.push(BoxVertex {
                position: [p.x, p.y, z],
                clip,
                corner,
                fill: fill.to_array(),
                border: border.to_array(),
                border_width,
                corner_radius,
            });
        }
    }

    /// A box in the widget's state colors with the theme's metrics.
    pub fn draw_themed_box(&mut self, rect: Rect) {
        let fill = self.background_color();
        let border = self.focus_color();
        let (width, radius) = (self.theme.border_width(), self.theme.rounding_radius());
        self.draw_box(rect, fill, border, width, radius);
    }

    /// An image stretched over `rect`.
    pub fn draw_image(&mut self, rect: Rect, image: &ImageHandle) {
        let rect = self.to_window(rect);
        if rect.is_empty() || rect.intersection(&self.clip).is_empty() {
            return;
        }
        let z = self.z();
        let clip = clip_array(self.clip);
        let layer = image.texture as f32;
        let uv = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        for (p, [u, v]) in corners(rect).into_iter().zip(uv) {
            self.buffers.images.push(ImageVertex {
                position: [p.x, p.y, z],
                clip,
                texture: [u, v, layer],
            });
        }
    }

    /// Shaped text with its origin at `origin` (local coordinates).
    pub fn draw_text(&mut self, text: &dyn ShapedText, origin: Point, color: Color) {
        let z = self.z();
        let clip = clip_array(self.clip);
        let color = color.to_array();
        let offset = self.core.geometry().offset_from_window() + origin;
        for glyph in text.glyphs() {
            let bounds = glyph.bounds.translate(offset);
            if bounds.intersection(&self.clip).is_empty() {
                continue;
            }
            let uv = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
            for (p, [u, v]) in corners(bounds).into_iter().zip(uv) {
                self.buffers.sdf.push(SdfVertex {
                    position: [p.x, p.y, z],
                    clip,
                    texture: [u, v, glyph.glyph as f32],
                    color,
                });
            }
        }
    }
}
