#![forbid(unsafe_code)]

//! Shared, version-tracked cells with synchronous change notification.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its value in `Rc<RefCell<..>>`. A `set` that
//! actually changes the value (by `PartialEq`) bumps the version and calls
//! every live subscriber, in registration order, before returning. There is
//! no deferral or coalescing: a UI bound to a cell sees every distinct value.
//!
//! Owners hand out [`ReadSignal<T>`] views so that consumers can read and
//! subscribe but never write. The undo managers use this for their
//! `can_undo`/`can_redo` flags.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: a subscriber may call `set` on the same cell; the
//!   value borrow is released before callbacks run.
//! - **Subscriber leak**: callbacks live as long as their [`Subscription`]
//!   guard. Dead entries are pruned lazily on the next notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared value with change notification.
///
/// Cloning an `Observable` yields another handle to the **same** cell.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
pub struct Observable<T> {
    inner: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a cell holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            f(&mut inner.value);
            let changed = inner.value != before;
            if changed {
                inner.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
    }

    /// Register `callback` to run with the new value after every change.
    ///
    /// The callback stays registered until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing mutations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// A read-only view of this cell.
    #[must_use]
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            source: self.clone(),
        }
    }

    fn notify(&self) {
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (callbacks, inner.value.clone())
        };
        trace!(
            subscribers = callbacks.len(),
            "observable changed, notifying"
        );
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// Read-only handle to an [`Observable`].
pub struct ReadSignal<T> {
    source: Observable<T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadSignal").field(&self.source).finish()
    }
}

impl<T: Clone + PartialEq + 'static> ReadSignal<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.source.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.source.with(f)
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.source.subscribe(callback)
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.source.version()
    }
}

/// RAII guard keeping a subscriber callback alive.
///
/// Dropping it drops the only strong reference to the callback, so the
/// cell's weak entry stops upgrading.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    #[test]
    fn set_changes_value_and_version() {
        let obs = Observable::new(false);
        assert!(!obs.get());
        assert_eq!(obs.version(), 0);

        obs.set(true);
        assert!(obs.get());
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_set_is_silent() {
        let obs = Observable::new(7);
        let hits = Rc::new(StdCell::new(0u32));
        let hits_cb = Rc::clone(&hits);
        let _sub = obs.subscribe(move |_| hits_cb.set(hits_cb.get() + 1));

        obs.set(7);
        assert_eq!(obs.version(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn subscriber_sees_new_value_synchronously() {
        let obs = Observable::new(0);
        let seen = Rc::new(StdCell::new(-1));
        let seen_cb = Rc::clone(&seen);
        let _sub = obs.subscribe(move |v| seen_cb.set(*v));

        obs.set(3);
        assert_eq!(seen.get(), 3);
        obs.update(|v| *v += 1);
        assert_eq!(seen.get(), 4);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let obs = Observable::new(0);
        let hits = Rc::new(StdCell::new(0u32));
        let hits_cb = Rc::clone(&hits);
        let sub = obs.subscribe(move |_| hits_cb.set(hits_cb.get() + 1));

        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(hits.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn notification_follows_registration_order() {
        let obs = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&log);
        let b = Rc::clone(&log);
        let _first = obs.subscribe(move |_| a.borrow_mut().push("first"));
        let _second = obs.subscribe(move |_| b.borrow_mut().push("second"));

        obs.set(1);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn clones_share_the_cell() {
        let a = Observable::new(String::from("x"));
        let b = a.clone();
        b.set("y".into());
        assert_eq!(a.get(), "y");
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn update_without_change_keeps_version() {
        let obs = Observable::new(10);
        obs.update(|v| *v = 10);
        assert_eq!(obs.version(), 0);
    }

    #[test]
    fn read_signal_tracks_source() {
        let obs = Observable::new(false);
        let view = obs.read_only();
        let seen = Rc::new(StdCell::new(false));
        let seen_cb = Rc::clone(&seen);
        let _sub = view.subscribe(move |v| seen_cb.set(*v));

        obs.set(true);
        assert!(view.get());
        assert!(seen.get());
        assert_eq!(view.version(), 1);
        assert!(view.with(|v| *v));
    }

    #[test]
    fn reentrant_set_from_subscriber() {
        let obs = Observable::new(0);
        let mirror = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v == 1 {
                mirror.set(2);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 2);
    }

    #[test]
    fn debug_lists_value() {
        let obs = Observable::new(5);
        let text = format!("{obs:?}");
        assert!(text.contains("Observable"));
        assert!(text.contains("version"));
    }
}
