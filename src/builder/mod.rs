//! Builder API for ergonomic store construction.
//!
//! This module provides a fluent builder and a macro for assembling reducer
//! maps and stores with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod store;

pub use error::BuildError;
pub use store::StoreBuilder;
