#![forbid(unsafe_code)]

//! Lock-free deadline/urgency register.
//!
//! A [`Trigger`] answers "does this subtree need attention before time T,
//! and how urgently". Requests from any thread are merged: the stored
//! deadline is the earliest requested since the last [`Trigger::check`], the
//! stored level the highest. No queue is kept.
//!
//! A trigger may forward every request to a parent trigger, so a window
//! trigger aggregates the urgency of its whole widget tree.
//!
//! # Example
//!
//! ```
//! use trellis_core::time::TimePoint;
//! use trellis_core::trigger::Trigger;
//!
//! let trigger = Trigger::new();
//! trigger.add(TimePoint::from_millis(1_010), 2);
//! trigger.add(TimePoint::from_millis(1_005), 5);
//!
//! assert_eq!(trigger.check(TimePoint::from_millis(1_004)), 0);
//! assert_eq!(trigger.check(TimePoint::from_millis(1_005)), 5);
//! assert_eq!(trigger.check(TimePoint::from_millis(1_005)), 0);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::time::TimePoint;

/// Urgency levels used by the widget frame protocol.
pub mod level {
    /// Nothing pending.
    pub const NONE: u8 = 0;
    /// Repaint without recomputing constraints.
    pub const REDRAW: u8 = 1;
    /// Recompute constraints, then repaint.
    pub const RELAYOUT: u8 = 2;
}

const LEVEL_BITS: u32 = 8;
const LEVEL_MASK: u64 = (1 << LEVEL_BITS) - 1;
const EMPTY: u64 = pack(TimePoint::MAX, level::NONE);

#[inline]
const fn pack(deadline: TimePoint, level: u8) -> u64 {
    (deadline.as_micros() << LEVEL_BITS) | level as u64
}

#[inline]
const fn unpack(state: u64) -> (TimePoint, u8) {
    (
        TimePoint::from_micros(state >> LEVEL_BITS),
        (state & LEVEL_MASK) as u8,
    )
}

/// Merged deadline and level, updated atomically as a unit.
pub struct Trigger {
    state: AtomicU64,
    parent: Option<Arc<Trigger>>,
}

impl Trigger {
    /// A trigger with nothing pending and no parent.
    pub const fn new() -> Self {
        Self {
            state: AtomicU64::new(EMPTY),
            parent: None,
        }
    }

    /// A trigger that forwards every request to `parent`.
    pub fn with_parent(parent: Arc<Trigger>) -> Self {
        Self {
            state: AtomicU64::new(EMPTY),
            parent: Some(parent),
        }
    }

    /// The trigger requests are forwarded to, if any.
    pub fn parent(&self) -> Option<&Arc<Trigger>> {
        self.parent.as_ref()
    }

    /// Request attention at `deadline` with urgency `level`.
    ///
    /// Merges into the stored state as `(min(deadline), max(level))`, then
    /// forwards the same request to the parent. The forward is a separate
    /// step; the parent may observe the request slightly after this trigger
    /// does. A zero level is ignored.
    pub fn add(&self, deadline: TimePoint, level: u8) -> &Self {
        debug_assert!(level > 0, "trigger level must be positive");
        if level == level::NONE {
            return self;
        }

        let _ = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (old_deadline, old_level) = unpack(current);
                let merged = pack(old_deadline.min(deadline), old_level.max(level));
                (merged != current).then_some(merged)
            });

        if let Some(parent) = &self.parent {
            parent.add(deadline, level);
        }
        self
    }

    /// Fire immediately at the lowest urgency.
    #[inline]
    pub fn fire(&self) -> &Self {
        self.add(TimePoint::MIN, level::REDRAW)
    }

    /// Fire at `deadline` with the lowest urgency.
    #[inline]
    pub fn schedule(&self, deadline: TimePoint) -> &Self {
        self.add(deadline, level::REDRAW)
    }

    /// Fire immediately with urgency `level`.
    #[inline]
    pub fn raise(&self, level: u8) -> &Self {
        self.add(TimePoint::MIN, level)
    }

    /// Consume the pending request if it is due.
    ///
    /// When `now` has reached the stored deadline, resets to the empty state
    /// and returns the accumulated level. Otherwise leaves the state
    /// untouched and returns 0.
    pub fn check(&self, now: TimePoint) -> u8 {
        match self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                let (deadline, _) = unpack(current);
                (current != EMPTY && now >= deadline).then_some(EMPTY)
            }) {
            Ok(previous) => unpack(previous).1,
            Err(_) => level::NONE,
        }
    }

    /// Read the pending deadline and level without consuming them.
    pub fn peek(&self) -> (TimePoint, u8) {
        unpack(self.state.load(Ordering::Acquire))
    }

    /// True when a request is stored, due or not.
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) != EMPTY
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (deadline, level) = self.peek();
        f.debug_struct("Trigger")
            .field("deadline", &deadline)
            .field("level", &level)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
