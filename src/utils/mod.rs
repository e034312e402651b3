// Utility functions and helpers

pub mod memo;
pub mod nested;

pub use memo::{Memo, Memoized, memoize};
pub use nested::{KeyNotFound, Nested, NestedLookup, access, access_nested_map};

/// Deep-merge `overlay` into `base`. Objects merge key by key; any other
/// overlay value replaces the base value.
pub fn merge_json_objects(
    base: serde_json::Value,
    overlay: serde_json::Value,
) -> serde_json::Value {
    match (base, overlay) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge_json_objects(base_value, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}
