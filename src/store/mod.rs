//! The observable store.
//!
//! A store owns the current state tree and an ordered list of subscribers.
//! Every change goes through [`Store::dispatch`], which runs the root reducer,
//! commits the result, then notifies subscribers synchronously.

pub mod error;
pub mod metadata;
mod store;
pub mod subscription;

pub use error::StoreError;
pub use metadata::StoreMetadata;
pub use store::{Store, WeakStore};
pub use subscription::{SubscriberError, SubscriptionId, Unsubscribe};
