use super::error::StoreError;
use super::metadata::StoreMetadata;
use super::subscription::{Callback, SubscriberError, Subscription, SubscriptionId, Unsubscribe};
use crate::builder::StoreBuilder;
use crate::core::{Action, ReducerMap, Snapshot, StateTree};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shared state behind every [`Store`] handle.
///
/// `state` and `subscribers` are only ever replaced wholesale, never edited
/// in place. No `RefCell` borrow is held while a reducer or a subscriber runs.
pub(crate) struct StoreInner {
    reducers: ReducerMap,
    state: RefCell<Snapshot>,
    subscribers: RefCell<Rc<[Subscription]>>,
    next_id: Cell<u64>,
    metadata: RefCell<StoreMetadata>,
}

impl StoreInner {
    fn snapshot(&self) -> Snapshot {
        self.state.borrow().clone()
    }

    fn subscribers(&self) -> Rc<[Subscription]> {
        self.subscribers.borrow().clone()
    }

    fn add_subscriber(&self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let current = self.subscribers();
        let next: Rc<[Subscription]> = current
            .iter()
            .cloned()
            .chain(std::iter::once(Subscription::new(id, callback)))
            .collect();
        *self.subscribers.borrow_mut() = next;
        id
    }

    pub(crate) fn remove_subscriber(&self, id: SubscriptionId) -> bool {
        let current = self.subscribers();
        if !current.iter().any(|s| s.id == id) {
            return false;
        }
        let next: Rc<[Subscription]> = current.iter().filter(|s| s.id != id).cloned().collect();
        *self.subscribers.borrow_mut() = next;
        tracing::trace!(subscription = %id, "unsubscribed");
        true
    }
}

/// A single-threaded observable state container.
///
/// The store holds one [`StateTree`], replaced as a whole by every successful
/// [`dispatch`](Store::dispatch). Reducers are fixed at construction.
/// Subscribers are called synchronously, in subscription order, after each
/// commit.
///
/// `Store` is a cheap handle: clones share the same state. It is neither
/// `Send` nor `Sync`, and callers sharing one across threads of execution
/// must serialize access themselves.
///
/// # Example
///
/// ```rust
/// use keystone::core::{Action, Reducer, ReducerMap, StateTree};
/// use keystone::Store;
/// use serde_json::json;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let reducers = ReducerMap::new()
///     .with("counter", Reducer::typed(|count: Option<i64>, action: &Action| {
///         let count = count.unwrap_or(0);
///         if action.is("INC") { count + 1 } else { count }
///     }))
///     .unwrap();
///
/// let store = Store::new(reducers, StateTree::new()).unwrap();
/// assert_eq!(store.value().get("counter"), Some(&json!(0)));
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let handle = store.subscribe(move |state| {
///     sink.borrow_mut().push(state.get("counter").cloned());
/// });
///
/// store.dispatch(Action::new("INC")).unwrap();
/// store.dispatch(Action::new("INC")).unwrap();
/// handle.unsubscribe();
/// store.dispatch(Action::new("INC")).unwrap();
///
/// assert_eq!(*seen.borrow(), vec![Some(json!(0)), Some(json!(1)), Some(json!(2))]);
/// assert_eq!(store.value().get("counter"), Some(&json!(3)));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// Create a store and compute its initial state.
    ///
    /// Every reducer runs once with [`Action::noop`] and its slice of
    /// `initial`, so reducers missing from `initial` still get to produce
    /// their defaults. Slices of `initial` with no reducer are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Reduce`] if a reducer fails during this first
    /// pass.
    pub fn new(reducers: ReducerMap, initial: StateTree) -> Result<Self, StoreError> {
        let state = reducers.reduce(&initial, &Action::noop())?;
        tracing::debug!(reducers = reducers.len(), "store initialized");

        Ok(Self {
            inner: Rc::new(StoreInner {
                reducers,
                state: RefCell::new(Arc::new(state)),
                subscribers: RefCell::new(Rc::from(Vec::new())),
                next_id: Cell::new(0),
                metadata: RefCell::new(StoreMetadata::default()),
            }),
        })
    }

    /// Start building a store with a fluent API.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The current state.
    ///
    /// This is the committed snapshot itself, not a copy. It stays valid and
    /// unchanged after later dispatches.
    pub fn value(&self) -> Snapshot {
        self.inner.snapshot()
    }

    /// Apply `action` and notify subscribers.
    ///
    /// The root reducer computes the next tree from the current one. Only if
    /// every reducer succeeds is the new tree committed. Subscribers
    /// registered when notification starts are then called in order, each
    /// with the same snapshot. Subscribing or unsubscribing from inside a
    /// subscriber only affects later dispatches.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Reduce`]: a reducer failed. The state is unchanged and
    ///   no subscriber ran.
    /// - [`StoreError::Subscriber`]: a subscriber failed after the state was
    ///   committed. Subscribers after it were not called.
    ///
    /// A panicking reducer unwinds out of this call with the state unchanged.
    pub fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        let current = self.inner.snapshot();
        let next = match self.inner.reducers.reduce(&current, &action) {
            Ok(next) => Arc::new(next),
            Err(e) => {
                tracing::debug!(action = ?action.kind(), reducer = %e.reducer, "dispatch aborted");
                return Err(e.into());
            }
        };

        *self.inner.state.borrow_mut() = Arc::clone(&next);
        self.inner.metadata.borrow_mut().record_commit();

        let subscribers = self.inner.subscribers();
        tracing::trace!(
            action = ?action.kind(),
            subscribers = subscribers.len(),
            "state committed"
        );

        for subscription in subscribers.iter() {
            subscription.notify(&next).map_err(|source| {
                tracing::debug!(subscription = %subscription.id, "subscriber failed");
                StoreError::Subscriber {
                    id: subscription.id,
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Register `callback` and immediately call it with the current state.
    ///
    /// The callback is appended to the end of the subscriber list. Use the
    /// returned handle to remove this registration.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn(&Snapshot) + 'static,
    {
        let callback = Rc::new(callback);
        let registered = Rc::clone(&callback);
        let id = self.inner.add_subscriber(Rc::new(move |state: &Snapshot| {
            registered(state);
            Ok::<(), SubscriberError>(())
        }));
        tracing::trace!(subscription = %id, "subscribed");

        callback(&self.value());
        Unsubscribe::new(id, Rc::downgrade(&self.inner))
    }

    /// Register a fallible subscriber and immediately call it with the
    /// current state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Subscriber`] if the initial call fails. The
    /// registration is removed again in that case.
    pub fn try_subscribe<F>(&self, callback: F) -> Result<Unsubscribe, StoreError>
    where
        F: Fn(&Snapshot) -> Result<(), SubscriberError> + 'static,
    {
        let callback: Callback = Rc::new(callback);
        let id = self.inner.add_subscriber(Rc::clone(&callback));
        tracing::trace!(subscription = %id, "subscribed");

        if let Err(source) = callback(&self.value()) {
            self.inner.remove_subscriber(id);
            return Err(StoreError::Subscriber { id, source });
        }
        Ok(Unsubscribe::new(id, Rc::downgrade(&self.inner)))
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// The reducers this store was built with.
    pub fn reducers(&self) -> &ReducerMap {
        &self.inner.reducers
    }

    /// A copy of the store's bookkeeping.
    pub fn metadata(&self) -> StoreMetadata {
        self.inner.metadata.borrow().clone()
    }

    /// A handle that does not keep the store alive.
    ///
    /// Subscribers that need to call back into the store should capture one
    /// of these instead of a `Store` clone, which would form a cycle.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning counterpart of [`Store`].
#[derive(Clone)]
pub struct WeakStore {
    inner: Weak<StoreInner>,
}

impl WeakStore {
    /// Recover the store if it is still alive.
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}
