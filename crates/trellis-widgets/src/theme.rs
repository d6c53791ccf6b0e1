#![forbid(unsafe_code)]

//! Theme lookups and state-dependent widget colors.
//!
//! A [`Theme`] is a pure function from a semantic role and nesting level to
//! a color or metric. The functions at the bottom of this module pick the
//! role and level for a widget from its enabled/hover/focus state.

use crate::base::WidgetCore;

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// A neutral gray.
    #[must_use]
    pub const fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Semantic color roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeColor {
    /// Widget backgrounds.
    Fill,
    /// Outlines and foreground decorations.
    Border,
    /// Focus and selection highlight.
    Accent,
}

/// Color and metric provider handed to the widget tree.
pub trait Theme: Send + Sync {
    /// Space between neighbouring widgets.
    fn margin(&self) -> f32;

    /// Width of widget outlines.
    fn border_width(&self) -> f32;

    /// Corner radius of rounded boxes.
    fn rounding_radius(&self) -> f32;

    /// Color for `role` at nesting level `layer`.
    fn color(&self, role: ThemeColor, layer: u32) -> Color;

    /// Color of label text.
    fn label_color(&self) -> Color;

    /// Window clear color.
    fn window_background(&self) -> Color {
        self.color(ThemeColor::Fill, 0)
    }
}

/// A dark gray theme with a blue accent.
#[derive(Debug, Clone)]
pub struct DefaultTheme {
    pub margin: f32,
    pub border_width: f32,
    pub rounding_radius: f32,
    fills: Vec<Color>,
    borders: Vec<Color>,
    accent: Color,
    label: Color,
}

impl Default for DefaultTheme {
    fn default() -> Self {
        Self {
            margin: 5.0,
            border_width: 1.0,
            rounding_radius: 4.0,
            fills: [0.05, 0.10, 0.15, 0.20, 0.25].map(Color::gray).to_vec(),
            borders: [0.30, 0.35, 0.40, 0.45, 0.50].map(Color::gray).to_vec(),
            accent: Color::rgb(0.10, 0.45, 0.90),
            label: Color::gray(0.90),
        }
    }
}

impl DefaultTheme {
    /// The default palette with zero margin, for tight layouts.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            margin: 0.0,
            ..Self::default()
        }
    }
}

fn cycle(colors: &[Color], layer: u32) -> Color {
    if colors.is_empty() {
        return Color::TRANSPARENT;
    }
    colors[layer as usize % colors.len()]
}

impl Theme for DefaultTheme {
    fn margin(&self) -> f32 {
        self.margin
    }

    fn border_width(&self) -> f32 {
        self.border_width
    }

    fn rounding_radius(&self) -> f32 {
        self.rounding_radius
    }

    fn color(&self, role: ThemeColor, layer: u32) -> Color {
        match role {
            ThemeColor::Fill => cycle(&self.fills, layer),
            ThemeColor::Border => cycle(&self.borders, layer),
            ThemeColor::Accent => self.accent,
        }
    }

    fn label_color(&self) -> Color {
        self.label
    }
}

fn layered(theme: &dyn Theme, role: ThemeColor, core: &WidgetCore) -> Color {
    let layer = core.semantic_layer();
    if !core.enabled() {
        theme.color(role, layer.saturating_sub(1))
    } else if core.hover() {
        theme.color(role, layer + 1)
    } else {
        theme.color(role, layer)
    }
}

/// Fill color: one layer up on hover, one down when disabled.
pub fn background_color(theme: &dyn Theme, core: &WidgetCore) -> Color {
    layered(theme, ThemeColor::Fill, core)
}

/// Border color, shifted like [`background_color`].
pub fn foreground_color(theme: &dyn Theme, core: &WidgetCore) -> Color {
    layered(theme, ThemeColor::Border, core)
}

/// Accent while focused in an active window, otherwise the foreground.
pub fn focus_color(theme: &dyn Theme, core: &WidgetCore, window_active: bool) -> Color {
    if core.enabled() && core.focus() && window_active {
        theme.color(ThemeColor::Accent, core.semantic_layer())
    } else {
        foreground_color(theme, core)
    }
}

/// Accent in an active window, border color otherwise.
pub fn accent_color(theme: &dyn Theme, core: &WidgetCore, window_active: bool) -> Color {
    if !core.enabled() {
        theme.color(ThemeColor::Border, core.semantic_layer().saturating_sub(1))
    } else if window_active {
        theme.color(ThemeColor::Accent, core.semantic_layer())
    } else {
        theme.color(ThemeColor::Border, core.semantic_layer())
    }
}

/// Text color, dimmed when disabled.
pub fn label_color(theme: &dyn Theme, core: &WidgetCore) -> Color {
    if core.enabled() {
        theme.label_color()
    } else {
        theme.color(ThemeColor::Border, core.semantic_layer().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trellis_core::trigger::Trigger;
    use trellis_layout::BoxModel;

    fn core(layer: u32) -> WidgetCore {
        WidgetCore::new(BoxModel::new(), Arc::new(Trigger::new()), layer)
    }

    #[test]
    fn hover_lifts_background_one_layer() {
        let theme = DefaultTheme::default();
        let mut c = core(1);
        let idle = background_color(&theme, &c);
        c.hover = true;
        assert_eq!(background_color(&theme, &c), theme.color(ThemeColor::Fill, 2));
        assert_ne!(background_color(&theme, &c), idle);
    }

    #[test]
    fn disabled_drops_one_layer_without_underflow() {
        let theme = DefaultTheme::default();
        let mut c = core(0);
        c.enabled = false;
        assert_eq!(background_color(&theme, &c), theme.color(ThemeColor::Fill, 0));
        assert_eq!(label_color(&theme, &c), theme.color(ThemeColor::Border, 0));
    }

    #[test]
    fn focus_color_needs_active_window() {
        let theme = DefaultTheme::default();
        let mut c = core(2);
        c.focus = true;
        assert_eq!(focus_color(&theme, &c, true), theme.color(ThemeColor::Accent, 2));
        assert_eq!(focus_color(&theme, &c, false), foreground_color(&theme, &c));
    }

    #[test]
    fn layers_wrap_around_palette() {
        let theme = DefaultTheme::default();
        assert_eq!(
            theme.color(ThemeColor::Fill, 5),
            theme.color(ThemeColor::Fill, 0)
        );
    }
}
