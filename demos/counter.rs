//! Counter example
//!
//! Demonstrates:
//! - Composing two reducers into one store
//! - Publish-on-subscribe and per-dispatch notification
//! - A failing reducer leaving the state untouched

use keystone::core::{Action, ReducerError};
use keystone::{Store, StoreError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Counter Store ===\n");

    let store = Store::builder()
        .typed_reducer("counter", |count: Option<i64>, action: &Action| {
            let count = count.unwrap_or(0);
            match action.kind() {
                Some("INC") => count + 1,
                Some("DEC") => count - 1,
                _ => count,
            }
        })
        .try_reducer("limit", |limit, action| {
            if action.is("DEC") {
                return Err(ReducerError::failed("decrement is disabled"));
            }
            Ok(limit.cloned().unwrap_or(serde_json::json!(10)))
        })
        .build()?;

    let handle = store.subscribe(|state| {
        println!("  state: {}", state.to_value());
    });

    println!("Incrementing twice:");
    store.dispatch(Action::new("INC"))?;
    store.dispatch(Action::new("INC"))?;

    println!("\nDecrementing (rejected by 'limit'):");
    match store.dispatch(Action::new("DEC")) {
        Err(StoreError::Reduce(e)) => println!("  {e}"),
        other => other?,
    }
    println!("  still: {}", store.value().to_value());

    handle.unsubscribe();
    store.dispatch(Action::new("INC"))?;
    println!("\nAfter unsubscribing: {}", store.value().to_value());
    println!("Committed dispatches: {}", store.metadata().dispatch_count);

    Ok(())
}
