//! The JSON-RPC request/response correlation identifier.

use serde::{Deserialize, Serialize};

/// A JSON-RPC `id` field.
///
/// Per the spec this is a number, a string, or `null`. `Null` is used by
/// notifications, which never receive a response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Id {
    /// A numeric id, assigned by a monotonic counter for outbound requests.
    Number(u64),
    /// A string id, accepted when deserializing responses from servers that
    /// don't mirror numeric ids back verbatim.
    String(String),
    /// No id: a notification, or a response this client never expects.
    None,
}

impl Id {
    /// `true` if this is [`Id::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_round_trips_as_bare_json_number() {
        let id = Id::Number(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        assert_eq!(serde_json::from_str::<Id>(&json).unwrap(), id);
    }

    #[test]
    fn none_round_trips_as_json_null() {
        let json = serde_json::to_string(&Id::None).unwrap();
        assert_eq!(json, "null");
        assert!(serde_json::from_str::<Id>(&json).unwrap().is_none());
    }
}
