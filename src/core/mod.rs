//! Core state container types.
//!
//! This module holds the pure part of the store:
//! - The `StateTree` that reducers populate
//! - `Action` messages that drive updates
//! - `Reducer` functions and the `ReducerMap` that composes them
//!
//! Nothing in here performs side effects; the `store` module owns the
//! mutable cell and the subscriber list.

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::{ComposeError, ReduceError, Reducer, ReducerError, ReducerMap};
pub use state::{Snapshot, StateTree};
