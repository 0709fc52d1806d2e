//! The state tree held by a store.
//!
//! A `StateTree` maps each reducer name to that reducer's substate. It has no
//! fixed schema: its shape is whatever the registered reducers produce.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Shared, immutable view of a committed state tree.
///
/// Every dispatch commits a brand new tree, so a snapshot captured earlier
/// keeps describing the state it was taken from.
pub type Snapshot = Arc<StateTree>;

/// Insertion-ordered mapping from reducer name to substate.
///
/// Iteration follows insertion order, which for trees produced by a store is
/// the order the reducers were registered in.
///
/// # Example
///
/// ```rust
/// use keystone::core::StateTree;
/// use serde_json::json;
///
/// let seed = StateTree::new()
///     .with("counter", json!(10))
///     .with("todos", json!([]));
///
/// assert_eq!(seed.get("counter"), Some(&json!(10)));
/// assert_eq!(seed.slice::<i64>("counter").unwrap(), Some(10));
/// assert_eq!(seed.names().collect::<Vec<_>>(), vec!["counter", "todos"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateTree {
    slices: Map<String, Value>,
}

impl StateTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { slices: Map::new() }
    }

    /// Return this tree with `name` set to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` to `value`, returning the previous substate.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.slices.insert(name.into(), value.into())
    }

    /// Raw substate stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slices.get(name)
    }

    /// Whether an entry exists for `name`, even a null one.
    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    /// Decode the substate under `name`.
    ///
    /// Returns `Ok(None)` when the entry is missing or null.
    pub fn slice<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, serde_json::Error> {
        match self.slices.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value).map(Some),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slices.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// The tree as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.slices.clone())
    }

    /// Input handed to the reducer registered under `name`.
    ///
    /// Only a missing entry reads as absent; a stored null is passed through.
    pub(crate) fn input_for(&self, name: &str) -> Option<&Value> {
        self.slices.get(name)
    }
}

impl From<Map<String, Value>> for StateTree {
    fn from(slices: Map<String, Value>) -> Self {
        Self { slices }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for StateTree {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            slices: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
