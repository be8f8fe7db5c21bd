//! Observer lists with removable subscription handles
//!
//! Every hook the scene exposes (before-render, world-matrix-updated,
//! enabled-changed) is an [`Observable`]. Consumers only see the
//! [`Subscribable`] capability, so a fake engine can stand in for a real one.
//!
//! ```rust
//! use tether_core::observable::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let hook = Observable::<u32>::new();
//! let seen = Rc::new(Cell::new(0));
//!
//! let seen_in_cb = seen.clone();
//! let sub = hook.add(move |v| seen_in_cb.set(*v));
//! hook.notify(&7);
//! assert_eq!(seen.get(), 7);
//!
//! sub.unsubscribe();
//! assert_eq!(hook.observer_count(), 0);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

new_key_type! {
    /// Identity of one registered observer
    pub struct ObserverId;
}

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// Something a callback can be attached to
///
/// The returned [`Subscription`] is the only way to remove the callback.
pub trait Subscribable<T> {
    fn subscribe(&self, callback: Box<dyn FnMut(&T)>) -> Subscription;
}

struct ObserverList<T> {
    callbacks: SlotMap<ObserverId, Callback<T>>,
    /// Registration order, notification follows it
    order: SmallVec<[ObserverId; 4]>,
}

impl<T> ObserverList<T> {
    fn remove(&mut self, id: ObserverId) -> bool {
        if self.callbacks.remove(id).is_none() {
            return false;
        }
        self.order.retain(|other| *other != id);
        true
    }
}

/// A list of callbacks notified in registration order
pub struct Observable<T: 'static> {
    list: Rc<RefCell<ObserverList<T>>>,
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Observable<T> {
    pub fn new() -> Self {
        Self {
            list: Rc::new(RefCell::new(ObserverList {
                callbacks: SlotMap::with_key(),
                order: SmallVec::new(),
            })),
        }
    }

    /// Register a callback
    pub fn add<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.callbacks.insert(callback);
            list.order.push(id);
            id
        };

        let weak = Rc::downgrade(&self.list);
        Subscription {
            id,
            detach: Some(Box::new(move || {
                weak.upgrade()
                    .is_some_and(|list| list.borrow_mut().remove(id))
            })),
        }
    }

    /// Invoke every registered callback with `value`
    ///
    /// Callbacks may subscribe or unsubscribe while running. A callback
    /// removed earlier in the same pass is not called. Returns the number of
    /// callbacks invoked.
    pub fn notify(&self, value: &T) -> usize {
        let snapshot: SmallVec<[(ObserverId, Callback<T>); 4]> = {
            let list = self.list.borrow();
            list.order
                .iter()
                .filter_map(|id| list.callbacks.get(*id).map(|cb| (*id, cb.clone())))
                .collect()
        };

        let mut fired = 0;
        for (id, callback) in snapshot {
            if !self.list.borrow().callbacks.contains_key(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut run) => {
                    (&mut *run)(value);
                    fired += 1;
                }
                Err(_) => {
                    tracing::warn!(?id, "observer already running, skipping re-entrant notification");
                }
            }
        }
        fired
    }

    pub fn observer_count(&self) -> usize {
        self.list.borrow().callbacks.len()
    }

    pub fn has_observers(&self) -> bool {
        self.observer_count() > 0
    }
}

impl<T: 'static> Subscribable<T> for Observable<T> {
    fn subscribe(&self, mut callback: Box<dyn FnMut(&T)>) -> Subscription {
        self.add(move |value: &T| callback(value))
    }
}

impl<T: 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Handle to one registered callback
///
/// Removing happens exactly once: either through [`Subscription::unsubscribe`]
/// or when the handle is dropped.
#[must_use = "dropping a Subscription removes its callback"]
pub struct Subscription {
    id: ObserverId,
    detach: Option<Box<dyn FnOnce() -> bool>>,
}

impl Subscription {
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Remove the callback. Returns false if the observable is already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.detach.take().is_some_and(|detach| detach())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
