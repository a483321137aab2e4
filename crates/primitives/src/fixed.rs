//! Fixed-width byte values: [`Address`], [`Hash`] and [`Bloom`].

use crate::hex;
use core::{fmt, str::FromStr};

macro_rules! fixed_bytes {
    ($name:ident, $len:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// The all-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Number of bytes in this fixed-width value.
            pub const LEN: usize = $len;

            /// Wraps a raw byte array.
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Returns the bytes as a slice.
            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            /// Returns `true` if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|&b| b == 0)
            }

            /// Builds from a slice, failing if the length does not match.
            pub fn try_from_slice(slice: &[u8]) -> Result<Self, core::array::TryFromSliceError> {
                <[u8; $len]>::try_from(slice).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = crate::ParseFixedBytesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s).map_err(crate::ParseFixedBytesError::Hex)?;
                Self::try_from_slice(&bytes)
                    .map_err(|_| crate::ParseFixedBytesError::WrongLength(bytes.len(), $len))
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(&hex::encode(self.0))
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(Address, 20, "A 20-byte EVM account address.");
fixed_bytes!(Hash, 32, "A 32-byte hash (block hash, transaction hash, storage key, ...).");
fixed_bytes!(Bloom, 256, "A 2048-bit (256-byte) logs bloom filter.");

/// Error returned when parsing a fixed-width byte value from a string.
#[derive(Debug, thiserror::Error)]
pub enum ParseFixedBytesError {
    /// The string was not valid hex.
    #[error(transparent)]
    Hex(#[from] hex::HexError),
    /// The decoded byte length did not match the expected width.
    #[error("expected {1} bytes, got {0}")]
    WrongLength(usize, usize),
}

impl Address {
    /// Formats this address with EIP-55 checksum casing.
    ///
    /// When `chain_id` is `Some`, the EIP-1191 variant mixes the chain id
    /// into the checksum so that addresses checksummed for one chain are
    /// not silently valid on another.
    pub fn to_checksum(&self, chain_id: Option<u64>) -> String {
        crate::checksum::checksum(&self.0, chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_hex() {
        let addr = Address::from([0xabu8; 20]);
        assert_eq!(addr.to_string(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn parse_round_trip() {
        let addr = Address::from([1u8; 20]);
        let s = addr.to_string();
        let parsed: Address = s.parse().unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn wrong_length_rejected() {
        let err = "0x1234".parse::<Hash>().unwrap_err();
        assert!(matches!(err, ParseFixedBytesError::WrongLength(2, 32)));
    }
}
