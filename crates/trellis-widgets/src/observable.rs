#![forbid(unsafe_code)]

//! Shared values that wake the widgets displaying them.
//!
//! Any thread may [`set`](Observable::set) a value. Each set bumps a version
//! number and raises the triggers of subscribed widgets, so the next frame
//! relayouts them. Widgets compare the version they last laid out against the
//! current one in `needs`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use trellis_core::trigger::{Trigger, level};

struct Shared<T> {
    value: Mutex<T>,
    version: AtomicU64,
    subscribers: Mutex<Vec<Weak<Trigger>>>,
}

/// A value shared between application code and widgets.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                version: AtomicU64::new(1),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Replace the value and wake subscribers.
    pub fn set(&self, value: T) {
        *lock(&self.shared.value) = value;
        self.shared.version.fetch_add(1, Ordering::AcqRel);
        let mut subscribers = lock(&self.shared.subscribers);
        subscribers.retain(|weak| match weak.upgrade() {
            Some(trigger) => {
                trigger.raise(level::RELAYOUT);
                true
            }
            None => false,
        });
    }

    /// Run `f` with the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.shared.value))
    }

    /// Monotonic change counter; starts at 1.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Raise `trigger` on every future change.
    ///
    /// Only a weak reference is kept. Triggers of removed widgets are
    /// dropped from the list on the next change or subscription.
    pub fn subscribe(&self, trigger: &Arc<Trigger>) {
        let mut subscribers = lock(&self.shared.subscribers);
        subscribers.retain(|weak| weak.strong_count() > 0);
        subscribers.push(Arc::downgrade(trigger));
    }
}

impl<T: Clone> Observable<T> {
    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use trellis_core::time::TimePoint;

    #[test]
    fn set_bumps_version_and_raises_subscribers() {
        let value = Observable::new(1);
        let trigger = Arc::new(Trigger::new());
        value.subscribe(&trigger);
        assert_eq!(value.version(), 1);
        value.set(2);
        assert_eq!(value.get(), 2);
        assert_eq!(value.version(), 2);
        assert_eq!(trigger.check(TimePoint::MIN), level::RELAYOUT);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let value = Observable::new("a".to_string());
        let trigger = Arc::new(Trigger::new());
        value.subscribe(&trigger);
        drop(trigger);
        value.set("b".to_string());
        assert!(lock(&value.shared.subscribers).is_empty());
    }

    #[test]
    fn resubscribing_without_changes_does_not_accumulate() {
        let value = Observable::new(0u8);
        for _ in 0..100 {
            let trigger = Arc::new(Trigger::new());
            value.subscribe(&trigger);
        }
        assert_eq!(lock(&value.shared.subscribers).len(), 1);

        let kept = Arc::new(Trigger::new());
        value.subscribe(&kept);
        assert_eq!(lock(&value.shared.subscribers).len(), 1);
        value.set(1);
        assert_eq!(kept.check(TimePoint::MIN), level::RELAYOUT);
    }

    #[test]
    fn set_from_another_thread() {
        let value = Observable::new(0u32);
        let writer = value.clone();
        thread::spawn(move || writer.set(7)).join().unwrap();
        assert_eq!(value.get(), 7);
    }
}
