#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are window coordinates in device-independent pixels with
//! the origin at the bottom-left corner and the y axis pointing up.

use std::ops::{Add, Sub};

/// A position in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    /// The empty extent.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new extent.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Extent) -> Extent {
        Extent::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Extent) -> Extent {
        Extent::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Clamp each component into `[lo, hi]`.
    ///
    /// `lo` wins when the bounds cross.
    #[inline]
    pub fn clamp(self, lo: Extent, hi: Extent) -> Extent {
        self.min(hi).max(lo)
    }

    /// True when every component of `self` lies within `[lo, hi]`.
    #[inline]
    pub fn fits_between(&self, lo: Extent, hi: Extent) -> bool {
        self.width >= lo.width
            && self.height >= lo.height
            && self.width <= hi.width
            && self.height <= hi.height
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from a position and an extent.
    #[inline]
    pub const fn from_parts(origin: Point, extent: Extent) -> Self {
        Self::new(origin.x, origin.y, extent.width, extent.height)
    }

    /// Create a rectangle at the origin with the given extent.
    #[inline]
    pub const fn from_extent(extent: Extent) -> Self {
        Self::new(0.0, 0.0, extent.width, extent.height)
    }

    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub const fn bottom(&self) -> f32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (exclusive).
    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Left and bottom edges are inclusive, right and top exclusive, so two
    /// abutting rectangles never both contain the shared edge.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.top()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if right <= x || top <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, top - y)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        Rect::new(x, y, right - x, top - y)
    }

    /// Shrink by the given sides; never produces a negative extent.
    pub fn inner(&self, sides: Sides) -> Rect {
        Rect::new(
            self.x + sides.left,
            self.y + sides.bottom,
            (self.width - sides.left - sides.right).max(0.0),
            (self.height - sides.bottom - sides.top).max(0.0),
        )
    }

    /// Grow by the given sides.
    pub fn outer(&self, sides: Sides) -> Rect {
        Rect::new(
            self.x - sides.left,
            self.y - sides.bottom,
            self.width + sides.left + sides.right,
            self.height + sides.bottom + sides.top,
        )
    }

    /// Translate by an offset.
    #[inline]
    pub fn translate(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// Padding or margin amounts on each side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Sides {
    /// No padding.
    pub const ZERO: Self = Self::all(0.0);

    /// The same amount on every side.
    #[inline]
    pub const fn all(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
        }
    }

    /// Separate horizontal and vertical amounts.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }

    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Sides {
    fn from(value: f32) -> Self {
        Self::all(value)
    }
}
