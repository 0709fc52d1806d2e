//! Reducers and their composition into a root reducer.
//!
//! A reducer is a pure function from `(substate, action)` to a new substate.
//! A `ReducerMap` composes named reducers into one update over a whole
//! `StateTree`.

use super::action::Action;
use super::state::StateTree;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by an individual reducer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReducerError {
    #[error("Reducer failed: {0}")]
    Failed(String),

    #[error("Failed to decode input: {0}")]
    Decode(String),

    #[error("Failed to encode output: {0}")]
    Encode(String),
}

impl ReducerError {
    /// Shorthand for [`ReducerError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Errors raised while composing reducers into a map.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComposeError {
    #[error("Reducer '{name}' is already registered. Reducer names must be unique")]
    DuplicateReducer { name: String },
}

/// A reduce pass aborted because one reducer failed.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Reducer '{reducer}' failed: {source}")]
pub struct ReduceError {
    /// Name the failing reducer was registered under
    pub reducer: String,
    #[source]
    pub source: ReducerError,
}

type ReduceFn = dyn Fn(Option<&Value>, &Action) -> Result<Value, ReducerError> + Send + Sync;

/// A pure substate update function.
///
/// Reducers must be deterministic and free of side effects. The store calls
/// each one exactly once per dispatch, and once at construction with
/// [`Action::noop`] and an absent substate so the reducer can supply its
/// default.
///
/// # Example
///
/// ```rust
/// use keystone::core::{Action, Reducer};
/// use serde_json::json;
///
/// let counter = Reducer::typed(|count: Option<i64>, action: &Action| {
///     let count = count.unwrap_or(0);
///     if action.is("INC") { count + 1 } else { count }
/// });
///
/// assert_eq!(counter.apply(None, &Action::noop()).unwrap(), json!(0));
/// assert_eq!(counter.apply(Some(&json!(4)), &Action::new("INC")).unwrap(), json!(5));
/// ```
#[derive(Clone)]
pub struct Reducer {
    reduce: Arc<ReduceFn>,
}

impl Reducer {
    /// Create a reducer from an infallible function over raw JSON values.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    {
        Self::try_new(move |state, action| Ok(f(state, action)))
    }

    /// Create a reducer that may fail.
    ///
    /// A failure aborts the whole dispatch and leaves the store untouched.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Result<Value, ReducerError> + Send + Sync + 'static,
    {
        Self {
            reduce: Arc::new(f),
        }
    }

    /// Create a reducer over a concrete substate type.
    ///
    /// The substate is decoded before the call and encoded after it. Either
    /// conversion failing is reported as a reducer failure. A missing or
    /// null substate reaches `f` as `None`.
    pub fn typed<T, F>(f: F) -> Self
    where
        T: Serialize + DeserializeOwned,
        F: Fn(Option<T>, &Action) -> T + Send + Sync + 'static,
    {
        Self::try_new(move |state, action| {
            let input = state
                .filter(|value| !value.is_null())
                .map(|value| T::deserialize(value))
                .transpose()
                .map_err(|e| ReducerError::Decode(e.to_string()))?;
            serde_json::to_value(f(input, action)).map_err(|e| ReducerError::Encode(e.to_string()))
        })
    }

    /// Run the reducer once.
    pub fn apply(&self, state: Option<&Value>, action: &Action) -> Result<Value, ReducerError> {
        (self.reduce)(state, action)
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer").finish_non_exhaustive()
    }
}

/// Named reducers in registration order.
///
/// Names are unique. The map is the root reducer: [`ReducerMap::reduce`] runs
/// every entry against its own slice of the tree and assembles the results
/// into a fresh tree.
///
/// # Example
///
/// ```rust
/// use keystone::core::{Action, Reducer, ReducerMap, StateTree};
/// use serde_json::json;
///
/// let mut reducers = ReducerMap::new();
/// reducers
///     .insert("flag", Reducer::new(|s, a| {
///         let flag = s.and_then(|v| v.as_bool()).unwrap_or(false);
///         json!(if a.is("TOGGLE") { !flag } else { flag })
///     }))
///     .unwrap();
///
/// let state = reducers.reduce(&StateTree::new(), &Action::noop()).unwrap();
/// assert_eq!(state.get("flag"), Some(&json!(false)));
///
/// let state = reducers.reduce(&state, &Action::new("TOGGLE")).unwrap();
/// assert_eq!(state.get("flag"), Some(&json!(true)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReducerMap {
    entries: Vec<(String, Reducer)>,
}

impl ReducerMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `reducer` under `name`.
    ///
    /// Fails if the name is already taken; the map is left unchanged.
    pub fn insert(&mut self, name: impl Into<String>, reducer: Reducer) -> Result<(), ComposeError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ComposeError::DuplicateReducer { name });
        }
        self.entries.push((name, reducer));
        Ok(())
    }

    /// Consuming form of [`ReducerMap::insert`].
    pub fn with(mut self, name: impl Into<String>, reducer: Reducer) -> Result<Self, ComposeError> {
        self.insert(name, reducer)?;
        Ok(self)
    }

    /// Whether a reducer is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// The reducer registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Reducer> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute the next tree from `state` and `action`.
    ///
    /// Pure: `state` is never modified and the result is always a freshly
    /// built tree holding exactly one entry per registered reducer. Entries
    /// of `state` with no reducer are dropped. The first failing reducer
    /// aborts the pass.
    pub fn reduce(&self, state: &StateTree, action: &Action) -> Result<StateTree, ReduceError> {
        let mut next = StateTree::new();
        for (name, reducer) in &self.entries {
            let value = reducer
                .apply(state.input_for(name), action)
                .map_err(|source| ReduceError {
                    reducer: name.clone(),
                    source,
                })?;
            next.insert(name.clone(), value);
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> Reducer {
        Reducer::typed(|count: Option<i64>, action: &Action| {
            let count = count.unwrap_or(0);
            match action.kind() {
                Some("INC") => count + 1,
                Some("DEC") => count - 1,
                _ => count,
            }
        })
    }

    #[test]
    fn insert_rejects_duplicate_names() {
        let mut map = ReducerMap::new();
        map.insert("counter", counter()).unwrap();

        let err = map.insert("counter", counter()).unwrap_err();
        assert_eq!(
            err,
            ComposeError::DuplicateReducer {
                name: "counter".to_string()
            }
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn reduce_seeds_every_reducer_from_empty_state() {
        let map = ReducerMap::new()
            .with("a", counter())
            .unwrap()
            .with("b", Reducer::new(|s, _| s.cloned().unwrap_or(json!("default"))))
            .unwrap();

        let state = map.reduce(&StateTree::new(), &Action::noop()).unwrap();
        assert_eq!(state.get("a"), Some(&json!(0)));
        assert_eq!(state.get("b"), Some(&json!("default")));
    }

    #[test]
    fn reduce_follows_registration_order() {
        let map = ReducerMap::new()
            .with("second", counter())
            .unwrap()
            .with("first", counter())
            .unwrap();

        let state = map.reduce(&StateTree::new(), &Action::noop()).unwrap();
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn reduce_does_not_touch_input() {
        let map = ReducerMap::new().with("counter", counter()).unwrap();
        let before = StateTree::new().with("counter", json!(3));
        let copy = before.clone();

        let after = map.reduce(&before, &Action::new("INC")).unwrap();
        assert_eq!(before, copy);
        assert_eq!(after.get("counter"), Some(&json!(4)));
    }

    #[test]
    fn reduce_keeps_null_outputs() {
        let map = ReducerMap::new()
            .with("nothing", Reducer::new(|_, _| Value::Null))
            .unwrap();

        let state = map.reduce(&StateTree::new(), &Action::noop()).unwrap();
        assert!(state.contains("nothing"));
        assert_eq!(state.get("nothing"), Some(&Value::Null));
    }

    #[test]
    fn reduce_drops_unregistered_slices() {
        let map = ReducerMap::new().with("counter", counter()).unwrap();
        let seed = StateTree::new()
            .with("counter", json!(1))
            .with("stray", json!(true));

        let state = map.reduce(&seed, &Action::noop()).unwrap();
        assert!(!state.contains("stray"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn reduce_stops_at_first_failure() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let later_calls_clone = later_calls.clone();

        let map = ReducerMap::new()
            .with("ok", counter())
            .unwrap()
            .with(
                "broken",
                Reducer::try_new(|_, a| {
                    if a.is("BOOM") {
                        Err(ReducerError::failed("boom"))
                    } else {
                        Ok(Value::Null)
                    }
                }),
            )
            .unwrap()
            .with(
                "later",
                Reducer::new(move |_, _| {
                    later_calls_clone.fetch_add(1, Ordering::SeqCst);
                    Value::Null
                }),
            )
            .unwrap();

        let err = map
            .reduce(&StateTree::new(), &Action::new("BOOM"))
            .unwrap_err();
        assert_eq!(err.reducer, "broken");
        assert_eq!(err.source, ReducerError::failed("boom"));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn typed_reducer_reports_decode_failure() {
        let map = ReducerMap::new().with("counter", counter()).unwrap();
        let seed = StateTree::new().with("counter", json!("not a number"));

        let err = map.reduce(&seed, &Action::noop()).unwrap_err();
        assert_eq!(err.reducer, "counter");
        assert!(matches!(err.source, ReducerError::Decode(_)));
    }

    #[test]
    fn null_slice_reaches_typed_reducer_as_absent() {
        let map = ReducerMap::new().with("counter", counter()).unwrap();
        let seed = StateTree::new().with("counter", Value::Null);

        let state = map.reduce(&seed, &Action::noop()).unwrap();
        assert_eq!(state.get("counter"), Some(&json!(0)));
    }

    #[test]
    fn null_slice_reaches_raw_reducer_as_null() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let map = ReducerMap::new()
            .with(
                "selection",
                Reducer::new(move |s, a| {
                    seen_clone.lock().unwrap().push(s.cloned());
                    if a.is("CLEAR") {
                        Value::Null
                    } else {
                        s.cloned().unwrap_or(json!(5))
                    }
                }),
            )
            .unwrap();

        let state = map.reduce(&StateTree::new(), &Action::noop()).unwrap();
        let state = map.reduce(&state, &Action::new("CLEAR")).unwrap();
        let state = map.reduce(&state, &Action::new("UNRELATED")).unwrap();

        assert_eq!(state.get("selection"), Some(&Value::Null));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some(json!(5)), Some(Value::Null)]
        );
    }

    #[test]
    fn lookup_by_name() {
        let map = ReducerMap::new().with("counter", counter()).unwrap();
        assert!(map.contains("counter"));
        assert!(map.get("counter").is_some());
        assert!(map.get("missing").is_none());
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["counter"]);
    }
}
