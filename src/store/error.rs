//! Store error types.

use super::subscription::{SubscriberError, SubscriptionId};
use crate::core::ReduceError;
use thiserror::Error;

/// Errors surfaced by [`Store`](super::Store) operations.
///
/// The two variants differ in what happened to the held state:
/// a `Reduce` failure leaves it untouched, while a `Subscriber` failure is
/// reported after the new state was already committed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// A reducer failed; nothing was committed and nobody was notified
    #[error(transparent)]
    Reduce(#[from] ReduceError),

    /// A subscriber failed; the state was committed and later subscribers
    /// in the same pass were skipped
    #[error("Subscriber {id} failed: {source}")]
    Subscriber {
        id: SubscriptionId,
        #[source]
        source: SubscriberError,
    },
}
