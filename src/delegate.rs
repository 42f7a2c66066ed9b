//! Publish/subscribe lists with re-entrancy safe dispatch.
//!
//! A [`Delegate`] fans one payload type out to any number of callbacks.
//! Callbacks may subscribe, unsubscribe or dispatch again on the same delegate
//! while a dispatch is running:
//!
//! - every dispatch iterates a snapshot taken when it started, so callbacks
//!   added during the dispatch wait for the next one;
//! - unsubscribing marks the registration as skipped, so a callback removed
//!   by an earlier callback does not fire later in the same dispatch;
//! - single-shot registrations are dropped from the list before any callback
//!   runs and fire at most once;
//! - a panicking callback is logged and does not stop the others.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static OWNER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of a subscriber, used to remove all of its registrations at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Owner for registrations that nobody removes in bulk.
    pub const ANONYMOUS: Self = Self(0);

    /// Allocate a fresh owner identity.
    pub fn next() -> Self {
        Self(OWNER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle of a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listener<T> {
    id: SubscriptionId,
    owner: OwnerId,
    callback: Box<dyn Fn(&T)>,
    single_shot: bool,
    skip: Cell<bool>,
}

/// Ordered list of callbacks receiving `&T`.
pub struct Delegate<T> {
    listeners: RefCell<Vec<Rc<Listener<T>>>>,
    // Single-shot registrations already pruned but not yet fired.
    in_flight: RefCell<Vec<Rc<Listener<T>>>>,
    next_id: Cell<u64>,
    destroyed: Cell<bool>,
}

impl<T> Delegate<T> {
    /// Create an empty delegate.
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            in_flight: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            destroyed: Cell::new(false),
        }
    }

    /// Register a callback.
    ///
    /// Single-shot callbacks are removed after their first invocation. After
    /// [`destroy`](Self::destroy) the callback is dropped without registering.
    pub fn subscribe(
        &self,
        owner: OwnerId,
        callback: impl Fn(&T) + 'static,
        single_shot: bool,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        if self.destroyed.get() {
            tracing::warn!(?owner, "subscribe on a destroyed delegate ignored");
            return id;
        }
        self.listeners.borrow_mut().push(Rc::new(Listener {
            id,
            owner,
            callback: Box::new(callback),
            single_shot,
            skip: Cell::new(false),
        }));
        id
    }

    /// Remove one registration. Returns `true` if it was found.
    pub fn unsubscribe(&self, owner: OwnerId, id: SubscriptionId) -> bool {
        let matches = |listener: &Rc<Listener<T>>| listener.owner == owner && listener.id == id;
        {
            let mut listeners = self.listeners.borrow_mut();
            if let Some(index) = listeners.iter().position(matches) {
                listeners[index].skip.set(true);
                listeners.remove(index);
                return true;
            }
        }
        let in_flight = self.in_flight.borrow();
        match in_flight.iter().find(|listener| matches(*listener)) {
            Some(listener) if !listener.skip.get() => {
                listener.skip.set(true);
                true
            }
            _ => false,
        }
    }

    /// Remove every registration of `owner`. Returns how many were removed.
    pub fn unsubscribe_all(&self, owner: OwnerId) -> usize {
        let mut removed = 0;
        self.listeners.borrow_mut().retain(|listener| {
            if listener.owner != owner {
                return true;
            }
            listener.skip.set(true);
            removed += 1;
            false
        });
        for listener in self.in_flight.borrow().iter() {
            if listener.owner == owner && !listener.skip.get() {
                listener.skip.set(true);
                removed += 1;
            }
        }
        removed
    }

    /// Invoke every live callback with `args`, in subscription order.
    pub fn dispatch(&self, args: &T) {
        if self.destroyed.get() {
            return;
        }
        let (snapshot, pruned) = {
            let mut listeners = self.listeners.borrow_mut();
            let snapshot = listeners.clone();
            let pruned: Vec<_> = listeners
                .iter()
                .filter(|listener| listener.single_shot)
                .cloned()
                .collect();
            listeners.retain(|listener| !listener.single_shot);
            (snapshot, pruned)
        };
        if !pruned.is_empty() {
            self.in_flight.borrow_mut().extend(pruned.iter().cloned());
        }

        for listener in &snapshot {
            if listener.skip.get() {
                continue;
            }
            if listener.single_shot {
                listener.skip.set(true);
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| (listener.callback)(args)));
            if let Err(payload) = result {
                tracing::error!(
                    owner = ?listener.owner,
                    subscription = ?listener.id,
                    reason = panic_message(payload.as_ref()),
                    "delegate listener panicked"
                );
            }
        }

        if !pruned.is_empty() {
            self.in_flight
                .borrow_mut()
                .retain(|listener| !pruned.iter().any(|done| Rc::ptr_eq(listener, done)));
        }
    }

    /// Drop every registration. Later dispatches do nothing.
    pub fn destroy(&self) {
        self.destroyed.set(true);
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.skip.set(true);
        }
        for listener in self.in_flight.borrow_mut().drain(..) {
            listener.skip.set(true);
        }
    }

    /// Number of registrations that a dispatch started now would consider.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Check whether there are no registrations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Delegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Delegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("listeners", &self.len())
            .field("destroyed", &self.destroyed.get())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
