#![forbid(unsafe_code)]

//! Window configuration.

use std::env;

use trellis_core::geometry::Extent;
use trellis_layout::strength;

/// Settings fixed when a [`Window`](crate::Window) is created.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Extent the window opens with, before clamping to its limits.
    pub extent: Extent,
    /// Extra layout passes allowed per frame while widgets keep changing
    /// constraints.
    pub layout_retries: u32,
    /// Value suggested to the solver when probing the maximum extent.
    pub extent_sentinel: f64,
    /// Strength of the edit variables holding the root at the current
    /// extent. Must sit above the strength of preferred extents and below
    /// `REQUIRED`.
    pub stay_strength: f64,
    /// Whether the window starts with input focus.
    pub start_active: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("trellis"),
            extent: Extent::new(640.0, 480.0),
            layout_retries: 10,
            extent_sentinel: f64::from(u32::MAX),
            stay_strength: strength::STRONG,
            start_active: true,
        }
    }
}

impl WindowConfig {
    /// Defaults overridden by `TRELLIS_TITLE` and `TRELLIS_LAYOUT_RETRIES`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparsable values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(title) = lookup("TRELLIS_TITLE") {
            self.title = title;
        }
        if let Some(raw) = lookup("TRELLIS_LAYOUT_RETRIES") {
            match raw.trim().parse() {
                Ok(retries) => self.layout_retries = retries,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid TRELLIS_LAYOUT_RETRIES"),
            }
        }
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    #[must_use]
    pub fn with_layout_retries(mut self, retries: u32) -> Self {
        self.layout_retries = retries;
        self
    }

    #[must_use]
    pub fn with_extent_sentinel(mut self, sentinel: f64) -> Self {
        self.extent_sentinel = sentinel;
        self
    }

    #[must_use]
    pub fn with_stay_strength(mut self, strength: f64) -> Self {
        self.stay_strength = strength;
        self
    }

    #[must_use]
    pub fn with_start_active(mut self, active: bool) -> Self {
        self.start_active = active;
        self
    }
}
