//! State observers with explicit dispose handles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::GameState;

pub(crate) type Observer = Rc<dyn Fn(&Arc<GameState>)>;

/// Registered observers of one session.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: FxHashMap<u64, Observer>,
}

impl Observers {
    pub(crate) fn register(
        observers: &Rc<RefCell<Observers>>,
        observer: Observer,
    ) -> StateSubscription {
        let mut registry = observers.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, observer);
        StateSubscription {
            observers: Rc::downgrade(observers),
            id,
        }
    }

    /// Snapshot of the current callbacks, so they can run without a borrow held.
    pub(crate) fn callbacks(&self) -> Vec<Observer> {
        self.callbacks.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

/// Dispose handle for a state observer.
///
/// The observer stops being called once the handle is disposed or dropped.
#[must_use = "dropping a StateSubscription stops the observer immediately"]
pub struct StateSubscription {
    observers: Weak<RefCell<Observers>>,
    id: u64,
}

impl StateSubscription {
    /// Stop observing.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for StateSubscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.borrow_mut().callbacks.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for StateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSubscription").field("id", &self.id).finish()
    }
}
