#![forbid(unsafe_code)]

//! Resources produced off the render thread.
//!
//! A [`Backing`] is the widget side of a one-shot result; the producer holds
//! the matching [`BackingPromise`]. The widget polls the backing during the
//! frame and never blocks on it: pending means "nothing to draw yet".

use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use trellis_core::trigger::{Trigger, level};

/// Why a backing resource could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackingError {
    /// The producer dropped its promise without a result.
    Abandoned,
    /// Decoding or allocation failed.
    Failed(String),
}

impl fmt::Display for BackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abandoned => write!(f, "backing producer went away without a result"),
            Self::Failed(reason) => write!(f, "backing failed: {reason}"),
        }
    }
}

impl std::error::Error for BackingError {}

struct Slot<T> {
    result: OnceLock<Result<T, BackingError>>,
    waiter: Mutex<Option<Weak<Trigger>>>,
}

impl<T> Slot<T> {
    fn wake(&self) {
        let waiter = self
            .waiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade);
        if let Some(trigger) = waiter {
            trigger.raise(level::RELAYOUT);
        }
    }
}

/// Current state of a backing.
#[derive(Debug, PartialEq, Eq)]
pub enum BackingState<'a, T> {
    Pending,
    Ready(&'a T),
    Failed(&'a BackingError),
}

/// Widget side of a one-shot resource.
pub struct Backing<T> {
    slot: Arc<Slot<T>>,
}

/// Producer side of a one-shot resource.
pub struct BackingPromise<T> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T> Backing<T> {
    /// A pending backing and the promise that completes it.
    #[must_use]
    pub fn pending() -> (Self, BackingPromise<T>) {
        let slot = Arc::new(Slot {
            result: OnceLock::new(),
            waiter: Mutex::new(None),
        });
        (
            Self {
                slot: Arc::clone(&slot),
            },
            BackingPromise { slot: Some(slot) },
        )
    }

    /// A backing that is already available.
    #[must_use]
    pub fn ready(value: T) -> Self {
        let (backing, promise) = Self::pending();
        promise.fulfil(Ok(value));
        backing
    }

    /// Non-blocking poll.
    pub fn state(&self) -> BackingState<'_, T> {
        match self.slot.result.get() {
            None => BackingState::Pending,
            Some(Ok(value)) => BackingState::Ready(value),
            Some(Err(error)) => BackingState::Failed(error),
        }
    }

    /// Whether a result (success or failure) is available.
    pub fn is_settled(&self) -> bool {
        self.slot.result.get().is_some()
    }

    /// Raise `trigger` when the result arrives; immediately if it already
    /// has.
    pub fn notify(&self, trigger: &Arc<Trigger>) {
        *self
            .slot
            .waiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::downgrade(trigger));
        if self.is_settled() {
            trigger.raise(level::RELAYOUT);
        }
    }
}

impl<T> BackingPromise<T> {
    /// Complete the backing. Later calls are ignored.
    pub fn fulfil(mut self, result: Result<T, BackingError>) {
        if let Some(slot) = self.slot.take() {
            let _ = slot.result.set(result);
            slot.wake();
        }
    }
}

impl<T> Drop for BackingPromise<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            let _ = slot.result.set(Err(BackingError::Abandoned));
            slot.wake();
        }
    }
}
