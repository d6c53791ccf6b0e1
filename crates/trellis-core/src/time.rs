#![forbid(unsafe_code)]

//! Frame time points and clocks.
//!
//! A [`TimePoint`] counts microseconds since a process-wide epoch. The range
//! is limited to 56 bits so a time point and an 8-bit level fit together in a
//! single atomic word (see [`Trigger`](crate::trigger::Trigger)).

use std::fmt;
use std::ops::{Add, Sub};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const TICKS_MASK: u64 = (1 << 56) - 1;

/// A point in time with microsecond resolution.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimePoint(u64);

impl TimePoint {
    /// The earliest representable time. Deadlines at `MIN` are always due.
    pub const MIN: Self = Self(0);

    /// The latest representable time, used as "never".
    pub const MAX: Self = Self(TICKS_MASK);

    /// Create a time point from microseconds since the epoch.
    ///
    /// Values beyond the representable range saturate to [`TimePoint::MAX`].
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        if micros > TICKS_MASK {
            Self::MAX
        } else {
            Self(micros)
        }
    }

    /// Create a time point from milliseconds since the epoch.
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_micros(millis.saturating_mul(1_000))
    }

    /// Microseconds since the epoch.
    #[inline]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// True for the "never" sentinel.
    #[inline]
    pub const fn is_never(self) -> bool {
        self.0 == TICKS_MASK
    }

    /// Elapsed time from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn saturating_duration_since(self, earlier: TimePoint) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for TimePoint {
    type Output = TimePoint;

    fn add(self, rhs: Duration) -> TimePoint {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        TimePoint::from_micros(self.0.saturating_add(micros))
    }
}

impl Sub<Duration> for TimePoint {
    type Output = TimePoint;

    fn sub(self, rhs: Duration) -> TimePoint {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        TimePoint(self.0.saturating_sub(micros))
    }
}

impl fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_never() {
            f.write_str("TimePoint(never)")
        } else {
            write!(f, "TimePoint({}us)", self.0)
        }
    }
}

/// Source of frame time points.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> TimePoint;
}

static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Wall-independent monotonic clock anchored at the first use in this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> TimePoint {
        let micros = u64::try_from(EPOCH.elapsed().as_micros()).unwrap_or(u64::MAX);
        TimePoint::from_micros(micros)
    }
}

/// A clock that only moves when told to.
///
/// Used to drive frames deterministically in tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Create a clock stopped at `start`.
    pub fn new(start: TimePoint) -> Self {
        Self {
            micros: AtomicU64::new(start.as_micros()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let now = self.now() + by;
        self.micros.store(now.as_micros(), Ordering::Relaxed);
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: TimePoint) {
        self.micros.store(to.as_micros(), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimePoint {
        TimePoint::from_micros(self.micros.load(Ordering::Relaxed))
    }
}
