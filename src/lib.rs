//! Keystone: a minimal observable state container
//!
//! A store holds a single state tree that only changes through pure reducer
//! functions, applied in response to action messages. Subscribers are
//! notified synchronously after every change.
//!
//! # Core Concepts
//!
//! - **StateTree**: a mapping from reducer name to that reducer's substate
//! - **Action**: a transient message with a type and a payload
//! - **Reducer**: a pure function from `(substate, action)` to a new substate
//! - **Store**: owns the state and the subscribers, and exposes `dispatch`,
//!   `subscribe` and `value`
//!
//! Every dispatch builds a fresh tree; snapshots handed out earlier never
//! change. A dispatch either commits and notifies every subscriber, or fails
//! in a reducer and changes nothing.
//!
//! # Example
//!
//! ```rust
//! use keystone::core::Action;
//! use keystone::Store;
//! use serde_json::json;
//!
//! let store = Store::builder()
//!     .typed_reducer("counter", |count: Option<i64>, action: &Action| {
//!         let count = count.unwrap_or(0);
//!         if action.is("INC") { count + 1 } else { count }
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.value().to_value(), json!({ "counter": 0 }));
//!
//! store.dispatch(Action::new("INC")).unwrap();
//! store.dispatch(Action::new("INC")).unwrap();
//! assert_eq!(store.value().to_value(), json!({ "counter": 2 }));
//! ```

pub mod builder;
pub mod core;
pub mod store;

// Re-export commonly used types
pub use crate::builder::{BuildError, StoreBuilder};
pub use crate::core::{Action, ComposeError, ReduceError, Reducer, ReducerError, ReducerMap, Snapshot, StateTree};
pub use crate::store::{Store, StoreError, SubscriberError, SubscriptionId, Unsubscribe};
