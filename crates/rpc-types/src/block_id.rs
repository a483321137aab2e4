//! Block selectors accepted by the `eth_get*` family of calls.

use chainrpc_primitives::Hash;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A block number, or one of the special tags a node accepts in its place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockNumberOrTag {
    /// The chain's current head.
    #[default]
    Latest,
    /// The most recent finalized block.
    Finalized,
    /// The most recent safe-head block.
    Safe,
    /// The genesis block.
    Earliest,
    /// The block currently being built.
    Pending,
    /// A specific block height.
    Number(u64),
}

impl BlockNumberOrTag {
    /// The numeric height, if this is [`Self::Number`].
    pub const fn as_number(&self) -> Option<u64> {
        match *self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl From<u64> for BlockNumberOrTag {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for BlockNumberOrTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Finalized => f.write_str("finalized"),
            Self::Safe => f.write_str("safe"),
            Self::Earliest => f.write_str("earliest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(n) => write!(f, "{}", chainrpc_primitives::hex::encode_quantity(*n as u128)),
        }
    }
}

impl FromStr for BlockNumberOrTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "latest" => Self::Latest,
            "finalized" => Self::Finalized,
            "safe" => Self::Safe,
            "earliest" => Self::Earliest,
            "pending" => Self::Pending,
            _ => {
                let digits = s.strip_prefix("0x").ok_or_else(|| format!("invalid block tag {s}"))?;
                Self::Number(u64::from_str_radix(digits, 16).map_err(|e| e.to_string())?)
            }
        })
    }
}

impl Serialize for BlockNumberOrTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BlockNumberOrTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A block selector: either a tag/number, or a specific block hash.
///
/// Serializes as a bare string for the number-or-tag form, matching the
/// convention most `eth_get*` positional parameters expect; callers that
/// need the `{blockHash: ..., requireCanonical: ...}` object form (EIP-1898)
/// should pass [`Self::Hash`] through a method that wraps it accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// Select by number or tag.
    Number(BlockNumberOrTag),
    /// Select by hash.
    Hash(Hash),
}

impl Default for BlockId {
    fn default() -> Self {
        Self::Number(BlockNumberOrTag::Latest)
    }
}

impl From<BlockNumberOrTag> for BlockId {
    fn from(tag: BlockNumberOrTag) -> Self {
        Self::Number(tag)
    }
}

impl From<u64> for BlockId {
    fn from(n: u64) -> Self {
        Self::Number(BlockNumberOrTag::Number(n))
    }
}

impl From<Hash> for BlockId {
    fn from(hash: Hash) -> Self {
        Self::Hash(hash)
    }
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(tag) => tag.serialize(serializer),
            Self::Hash(hash) => hash.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BlockId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if let Ok(hash) = s.parse::<Hash>() {
            if s.len() == 66 {
                return Ok(Self::Hash(hash));
            }
        }
        s.parse::<BlockNumberOrTag>().map(Self::Number).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_as_lowercase_string() {
        let json = serde_json::to_value(BlockId::Number(BlockNumberOrTag::Safe)).unwrap();
        assert_eq!(json, "safe");
    }

    #[test]
    fn number_round_trips_as_hex_quantity() {
        let json = serde_json::to_value(BlockId::from(21_000u64)).unwrap();
        assert_eq!(json, "0x5208");
        let decoded: BlockId = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, BlockId::from(21_000u64));
    }

    #[test]
    fn full_length_hex_string_is_a_hash() {
        let hash = Hash::from([0x11u8; 32]);
        let json = serde_json::to_value(BlockId::Hash(hash)).unwrap();
        let decoded: BlockId = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, BlockId::Hash(hash));
    }
}
