#![forbid(unsafe_code)]

//! Single-writer, multi-reader cells for settled geometry.
//!
//! The layout thread stores a new value once per frame; any thread may load
//! the most recent value without locking. Both components are packed into
//! one `AtomicU64`, so a reader never sees a torn pair.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::{Extent, Point};

#[inline]
fn pack(a: f32, b: f32) -> u64 {
    (u64::from(a.to_bits()) << 32) | u64::from(b.to_bits())
}

#[inline]
fn unpack(bits: u64) -> (f32, f32) {
    (f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

/// Atomic [`Point`].
#[derive(Default)]
pub struct AtomicPoint(AtomicU64);

impl AtomicPoint {
    pub fn new(value: Point) -> Self {
        Self(AtomicU64::new(pack(value.x, value.y)))
    }

    #[inline]
    pub fn load(&self) -> Point {
        let (x, y) = unpack(self.0.load(Ordering::Relaxed));
        Point::new(x, y)
    }

    #[inline]
    pub fn store(&self, value: Point) {
        self.0.store(pack(value.x, value.y), Ordering::Relaxed);
    }
}

impl fmt::Debug for AtomicPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.load().fmt(f)
    }
}

/// Atomic [`Extent`].
#[derive(Default)]
pub struct AtomicExtent(AtomicU64);

impl AtomicExtent {
    pub fn new(value: Extent) -> Self {
        Self(AtomicU64::new(pack(value.width, value.height)))
    }

    #[inline]
    pub fn load(&self) -> Extent {
        let (width, height) = unpack(self.0.load(Ordering::Relaxed));
        Extent::new(width, height)
    }

    #[inline]
    pub fn store(&self, value: Extent) {
        self.0.store(pack(value.width, value.height), Ordering::Relaxed);
    }
}

impl fmt::Debug for AtomicExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.load().fmt(f)
    }
}
