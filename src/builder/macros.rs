//! Macros for ergonomic reducer composition.

/// Build a [`ReducerMap`](crate::core::ReducerMap) from `name => reducer`
/// pairs, preserving their order.
///
/// Evaluates to `Result<ReducerMap, BuildError>`; a repeated name yields
/// [`ComposeError::DuplicateReducer`](crate::core::ComposeError::DuplicateReducer)
/// wrapped in [`BuildError::Compose`](crate::builder::BuildError::Compose).
///
/// # Example
///
/// ```
/// use keystone::core::{Action, Reducer, StateTree};
/// use keystone::{reducer_map, Store};
/// use serde_json::json;
///
/// let reducers = reducer_map! {
///     "counter" => Reducer::typed(|n: Option<u32>, a: &Action| {
///         n.unwrap_or(0) + u32::from(a.is("INC"))
///     }),
///     "log" => Reducer::typed(|log: Option<Vec<String>>, a: &Action| {
///         let mut log = log.unwrap_or_default();
///         log.extend(a.kind().map(str::to_owned));
///         log
///     }),
/// }
/// .unwrap();
///
/// let store = Store::new(reducers, StateTree::new()).unwrap();
/// store.dispatch(Action::new("INC")).unwrap();
/// assert_eq!(store.value().to_value(), json!({ "counter": 1, "log": ["INC"] }));
/// ```
#[macro_export]
macro_rules! reducer_map {
    ($($name:expr => $reducer:expr),* $(,)?) => {
        (|| -> ::std::result::Result<$crate::core::ReducerMap, $crate::builder::BuildError> {
            #[allow(unused_mut)]
            let mut map = $crate::core::ReducerMap::new();
            $( map.insert($name, $reducer)?; )*
            ::std::result::Result::Ok(map)
        })()
    };
}
