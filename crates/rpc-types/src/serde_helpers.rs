//! Serde adapters for the Ethereum JSON-RPC "quantity" convention: `0x`-
//! prefixed hex with no leading zero nibbles (`"0x0"` for zero).

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

fn parse_quantity(s: &str) -> Result<u64, String> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).ok_or_else(|| format!("quantity {s} is missing its 0x prefix"))?;
    u64::from_str_radix(digits, 16).map_err(|e| e.to_string())
}

/// (De)serializes a `u64` as a hex quantity string.
pub mod quantity {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&chainrpc_primitives::hex::encode_quantity(*value as u128))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_quantity(&s).map_err(D::Error::custom)
    }
}

/// (De)serializes an `Option<u64>` as a hex quantity string, `null` for
/// `None`.
pub mod quantity_opt {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&chainrpc_primitives::hex::encode_quantity(*v as u128)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let opt = Option::<String>::deserialize(deserializer)?;
        opt.map(|s| parse_quantity(&s).map_err(D::Error::custom)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(with = "quantity")]
        value: u64,
    }

    #[test]
    fn quantity_round_trips() {
        let w = Wrapper { value: 21_000 };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"value":"0x5208"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value, 21_000);
    }
}
