//! Bookkeeping tracked alongside the state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata tracked by a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// When the store was created
    pub created_at: DateTime<Utc>,

    /// When the state was last committed
    pub updated_at: DateTime<Utc>,

    /// Number of dispatches that committed a new state
    pub dispatch_count: u64,
}

impl StoreMetadata {
    pub(crate) fn record_commit(&mut self) {
        self.updated_at = Utc::now();
        self.dispatch_count += 1;
    }
}

impl Default for StoreMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            dispatch_count: 0,
        }
    }
}
