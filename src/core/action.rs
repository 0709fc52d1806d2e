//! Action messages fed to reducers.
//!
//! An action is a transient value: it exists for the duration of a single
//! dispatch and is never stored by the store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reducer::ReducerError;

/// A message describing an intended state change.
///
/// The `type` is optional. An action without one is passed through to every
/// reducer unchanged, and reducers are expected to ignore types they do not
/// recognize.
///
/// # Example
///
/// ```rust
/// use keystone::core::Action;
/// use serde_json::json;
///
/// let action = Action::with_payload("ADD_TODO", json!({ "title": "write docs" }));
/// assert!(action.is("ADD_TODO"));
/// assert_eq!(action.payload()["title"], "write docs");
///
/// let noop = Action::noop();
/// assert_eq!(noop.kind(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

impl Action {
    /// Create an action with a type and a null payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            payload: Value::Null,
        }
    }

    /// Create an action with a type and a payload.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: Some(kind.into()),
            payload: payload.into(),
        }
    }

    /// The untyped action used to seed a store.
    ///
    /// No reducer recognizes it, so every reducer falls through to its
    /// default branch.
    pub fn noop() -> Self {
        Self::default()
    }

    /// The action type, if one was given.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Check whether this action carries the given type.
    pub fn is(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }

    /// The raw payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Decode the payload into a concrete type.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ReducerError> {
        T::deserialize(&self.payload).map_err(|e| ReducerError::Decode(e.to_string()))
    }
}
