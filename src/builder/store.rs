//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::core::{Action, ComposeError, Reducer, ReducerError, ReducerMap, StateTree};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Builder for constructing a [`Store`] with a fluent API.
///
/// Registration errors are deferred: the first duplicate name is remembered
/// and reported by [`StoreBuilder::build`].
///
/// # Example
///
/// ```rust
/// use keystone::builder::StoreBuilder;
/// use keystone::core::Action;
/// use serde_json::json;
///
/// let store = StoreBuilder::new()
///     .typed_reducer("counter", |count: Option<i64>, action: &Action| {
///         let count = count.unwrap_or(0);
///         if action.is("INC") { count + 1 } else { count }
///     })
///     .initial("counter", json!(41))
///     .build()
///     .unwrap();
///
/// store.dispatch(Action::new("INC")).unwrap();
/// assert_eq!(store.value().get("counter"), Some(&json!(42)));
/// ```
#[derive(Debug, Default)]
pub struct StoreBuilder {
    reducers: ReducerMap,
    initial: StateTree,
    error: Option<BuildError>,
}

impl StoreBuilder {
    /// Create a new builder with no reducers and an empty seed state.
    pub fn new() -> Self {
        Self {
            reducers: ReducerMap::new(),
            initial: StateTree::new(),
            error: None,
        }
    }

    /// Register a prebuilt reducer under `name`.
    pub fn add_reducer(mut self, name: impl Into<String>, reducer: Reducer) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.reducers.insert(name, reducer) {
                self.error = Some(e.into());
            }
        }
        self
    }

    /// Register an infallible reducer over raw values.
    pub fn reducer<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Value + Send + Sync + 'static,
    {
        self.add_reducer(name, Reducer::new(f))
    }

    /// Register a reducer that may fail.
    pub fn try_reducer<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> Result<Value, ReducerError> + Send + Sync + 'static,
    {
        self.add_reducer(name, Reducer::try_new(f))
    }

    /// Register a reducer over a concrete substate type.
    pub fn typed_reducer<T, F>(self, name: impl Into<String>, f: F) -> Self
    where
        T: Serialize + DeserializeOwned,
        F: Fn(Option<T>, &Action) -> T + Send + Sync + 'static,
    {
        self.add_reducer(name, Reducer::typed(f))
    }

    /// Register every reducer of an existing map, in its order.
    pub fn reducers(mut self, reducers: ReducerMap) -> Self {
        if self.reducers.is_empty() {
            self.reducers = reducers;
            return self;
        }
        for name in reducers.names() {
            if let Some(reducer) = reducers.get(name) {
                self = self.add_reducer(name, reducer.clone());
            }
        }
        self
    }

    /// Seed the substate for `name`.
    pub fn initial(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial.insert(name, value);
        self
    }

    /// Replace the whole seed state.
    pub fn initial_state(mut self, state: StateTree) -> Self {
        self.initial = state;
        self
    }

    /// Build the store, running every reducer once against the seed state.
    pub fn build(self) -> Result<Store, BuildError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(Store::new(self.reducers, self.initial)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_empty_store() {
        let store = StoreBuilder::new().build().unwrap();
        assert!(store.value().is_empty());
    }

    #[test]
    fn reports_duplicate_reducer() {
        let result = StoreBuilder::new()
            .reducer("a", |_, _| json!(1))
            .reducer("a", |_, _| json!(2))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Compose(ComposeError::DuplicateReducer { ref name })) if name == "a"
        ));
    }

    #[test]
    fn first_duplicate_wins() {
        let result = StoreBuilder::new()
            .reducer("a", |_, _| json!(1))
            .reducer("a", |_, _| json!(2))
            .reducer("b", |_, _| json!(1))
            .reducer("b", |_, _| json!(2))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Compose(ComposeError::DuplicateReducer { ref name })) if name == "a"
        ));
    }

    #[test]
    fn reports_initialization_failure() {
        let result = StoreBuilder::new()
            .try_reducer("broken", |_, _| Err(ReducerError::failed("no default")))
            .build();

        assert!(matches!(result, Err(BuildError::Initialization(_))));
    }

    #[test]
    fn seeds_initial_state() {
        let store = StoreBuilder::new()
            .reducer("name", |s, _| s.cloned().unwrap_or(json!("anonymous")))
            .reducer("age", |s, _| s.cloned().unwrap_or(json!(0)))
            .initial("name", "ada")
            .build()
            .unwrap();

        assert_eq!(store.value().get("name"), Some(&json!("ada")));
        assert_eq!(store.value().get("age"), Some(&json!(0)));
    }

    #[test]
    fn merges_reducer_maps() {
        let first = ReducerMap::new()
            .with("a", Reducer::new(|_, _| json!("a")))
            .unwrap();
        let second = ReducerMap::new()
            .with("b", Reducer::new(|_, _| json!("b")))
            .unwrap();

        let store = StoreBuilder::new()
            .reducers(first)
            .reducers(second)
            .build()
            .unwrap();

        assert_eq!(store.value().names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn merging_overlapping_maps_fails() {
        let first = ReducerMap::new()
            .with("a", Reducer::new(|_, _| json!(1)))
            .unwrap();

        let result = StoreBuilder::new()
            .reducers(first.clone())
            .reducers(first)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Compose(ComposeError::DuplicateReducer { .. }))
        ));
    }
}
