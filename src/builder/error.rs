//! Build errors for reducer maps and stores.

use crate::core::ComposeError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur when assembling reducers or building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Initial state could not be computed: {0}")]
    Initialization(#[from] StoreError),
}
