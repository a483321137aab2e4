use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

/// Captures JSON fields not modeled by the struct it's flattened into, so
/// chain-specific RPC extensions round-trip instead of being dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtherFields {
    inner: BTreeMap<String, serde_json::Value>,
}

impl OtherFields {
    /// Returns `true` if no unrecognized fields were captured.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Deserializes the named field into `V`, if present.
    pub fn get_deserialized<V: DeserializeOwned>(&self, key: &str) -> Option<serde_json::Result<V>> {
        self.inner.get(key).cloned().map(serde_json::from_value)
    }

    /// Inserts a raw JSON value under `key`.
    pub fn insert(&mut self, key: String, value: serde_json::Value) {
        self.inner.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_unknown_fields() {
        let json = r#"{"foo":"bar","count":3}"#;
        let fields: OtherFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.get_deserialized::<String>("foo").unwrap().unwrap(), "bar");
        assert_eq!(fields.get_deserialized::<u64>("count").unwrap().unwrap(), 3);
    }
}
