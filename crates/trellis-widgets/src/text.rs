#![forbid(unsafe_code)]

//! The shaped-text interface consumed by text-bearing widgets.
//!
//! Real shaping (fonts, bidi, line breaking) is provided by the
//! application. [`MonospaceText`] is a fixed-advance stand-in that is good
//! enough for headless rendering and layout tests.

use trellis_core::geometry::{Extent, Rect};

/// One glyph placed relative to the text's bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Index into the glyph atlas.
    pub glyph: u32,
    /// Bounding box relative to the text origin.
    pub bounds: Rect,
}

/// Text that has already been shaped.
pub trait ShapedText: 'static {
    /// Extent of the text laid out on as few lines as possible.
    fn preferred_extent(&self) -> Extent;

    /// Smallest extent the text can be wrapped into.
    fn minimum_extent(&self) -> Extent;

    /// Glyphs to draw, in the preferred layout.
    fn glyphs(&self) -> &[PositionedGlyph];
}

/// Fixed-advance, single-line text.
#[derive(Debug, Clone, PartialEq)]
pub struct MonospaceText {
    text: String,
    advance: f32,
    line_height: f32,
    glyphs: Vec<PositionedGlyph>,
}

impl MonospaceText {
    /// Default glyph advance in pixels.
    pub const ADVANCE: f32 = 8.0;
    /// Default line height in pixels.
    pub const LINE_HEIGHT: f32 = 16.0;

    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_metrics(text, Self::ADVANCE, Self::LINE_HEIGHT)
    }

    #[must_use]
    pub fn with_metrics(text: impl Into<String>, advance: f32, line_height: f32) -> Self {
        let text = text.into();
        let glyphs = text
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| PositionedGlyph {
                glyph: u32::from(c),
                bounds: Rect::new(i as f32 * advance, 0.0, advance, line_height),
            })
            .collect();
        Self {
            text,
            advance,
            line_height,
            glyphs,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl ShapedText for MonospaceText {
    fn preferred_extent(&self) -> Extent {
        Extent::new(
            self.text.chars().count() as f32 * self.advance,
            self.line_height,
        )
    }

    /// The longest word on its own line; the height grows with the number
    /// of words.
    fn minimum_extent(&self) -> Extent {
        let mut longest = 0usize;
        let mut words = 0usize;
        for word in self.text.split_whitespace() {
            longest = longest.max(word.chars().count());
            words += 1;
        }
        Extent::new(
            longest as f32 * self.advance,
            words.max(1) as f32 * self.line_height,
        )
    }

    fn glyphs(&self) -> &[PositionedGlyph] {
        &self.glyphs
    }
}
