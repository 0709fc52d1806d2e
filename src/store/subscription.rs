//! Subscriber registrations and their unsubscribe handles.

use super::store::StoreInner;
use crate::core::Snapshot;
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Identifier of a single `subscribe` call.
///
/// Registering the same callback twice yields two ids, and each
/// [`Unsubscribe`] handle removes only its own registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failure reported by a fallible subscriber.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct SubscriberError {
    pub message: String,
}

impl SubscriberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub(crate) type Callback = Rc<dyn Fn(&Snapshot) -> Result<(), SubscriberError>>;

/// One entry of the subscriber list.
#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    callback: Callback,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, callback: Callback) -> Self {
        Self { id, callback }
    }

    pub(crate) fn notify(&self, state: &Snapshot) -> Result<(), SubscriberError> {
        (self.callback)(state)
    }
}

/// Handle returned by [`Store::subscribe`](super::Store::subscribe).
///
/// Dropping the handle keeps the subscription alive; call
/// [`Unsubscribe::unsubscribe`] to remove it. The handle does not keep the
/// store alive.
#[derive(Clone, Debug)]
#[must_use = "dropping the handle leaves the subscriber registered with no way to remove it"]
pub struct Unsubscribe {
    id: SubscriptionId,
    store: Weak<StoreInner>,
}

impl Unsubscribe {
    pub(crate) fn new(id: SubscriptionId, store: Weak<StoreInner>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the registration this handle was issued for.
    ///
    /// Returns `true` if it was still registered. Further calls, or calls
    /// after the store is gone, are no-ops that return `false`.
    pub fn unsubscribe(&self) -> bool {
        self.store
            .upgrade()
            .is_some_and(|store| store.remove_subscriber(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_displays_with_hash() {
        assert_eq!(SubscriptionId::new(7).to_string(), "#7");
        assert_eq!(SubscriptionId::new(7).as_u64(), 7);
    }

    #[test]
    fn ids_order_by_issue() {
        assert!(SubscriptionId::new(1) < SubscriptionId::new(2));
    }

    #[test]
    fn orphaned_handle_is_noop() {
        let handle = Unsubscribe::new(SubscriptionId::new(0), Weak::new());
        assert!(!handle.unsubscribe());
        assert!(!handle.unsubscribe());
    }

    #[test]
    fn subscriber_error_displays_message() {
        let err = SubscriberError::new("render failed");
        assert_eq!(err.to_string(), "render failed");
    }
}
