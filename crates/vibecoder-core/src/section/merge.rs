//! Shallow JSON-object merge used by section patches.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Overlays the top-level keys of `patch` onto `base`.
///
/// Nested objects are replaced, not merged.
pub fn shallow_merge(mut base: Map<String, Value>, patch: &Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
    base
}

/// Serializes a value that is known to be a JSON object into its map.
pub(crate) fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

pub(crate) fn from_object<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_keys_replace_base_keys() {
        let base = json!({"title": "Old", "body": "Keep", "nested": {"a": 1, "b": 2}});
        let patch = json!({"title": "New", "nested": {"a": 9}});

        let merged = shallow_merge(
            base.as_object().unwrap().clone(),
            patch.as_object().unwrap(),
        );

        assert_eq!(merged["title"], "New");
        assert_eq!(merged["body"], "Keep");
        // shallow: nested object replaced wholesale
        assert_eq!(merged["nested"], json!({"a": 9}));
    }
}
