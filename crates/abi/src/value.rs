use crate::ty::AbiType;
use chainrpc_primitives::{Address, Bytes, U256};

/// A dynamically-typed ABI value, tagged with the [`AbiType`] variant it
/// was encoded (or will be encoded) against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// `address`.
    Address(Address),
    /// `bool`.
    Bool(bool),
    /// `bytesN`: always exactly `N` bytes.
    FixedBytes(Vec<u8>),
    /// `bytes`.
    Bytes(Bytes),
    /// `string`.
    String(String),
    /// `uintN`, stored widened to 256 bits.
    UInt(U256, u16),
    /// `intN`, stored as its 256-bit two's-complement representation.
    Int(U256, u16),
    /// `T[N]`.
    FixedArray(Vec<AbiValue>),
    /// `T[]`.
    Array(Vec<AbiValue>),
    /// `(T1, T2, ...)`, or a named struct with the same layout.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Returns the [`AbiType`] this value was tagged with, inferring
    /// element/field types recursively.
    ///
    /// This only works for non-empty dynamic arrays; an empty `Array` or
    /// `FixedArray` cannot recover its element type from the value alone
    /// and must be paired with an explicit [`AbiType`] when encoding.
    pub fn guess_type(&self) -> Option<AbiType> {
        Some(match self {
            Self::Address(_) => AbiType::Address,
            Self::Bool(_) => AbiType::Bool,
            Self::FixedBytes(b) => AbiType::FixedBytes(b.len() as u8),
            Self::Bytes(_) => AbiType::Bytes,
            Self::String(_) => AbiType::String,
            Self::UInt(_, bits) => AbiType::UInt(*bits),
            Self::Int(_, bits) => AbiType::Int(*bits),
            Self::FixedArray(items) => {
                AbiType::FixedArray(items.len(), Box::new(items.first()?.guess_type()?))
            }
            Self::Array(items) => AbiType::Array(Box::new(items.first()?.guess_type()?)),
            Self::Tuple(items) => {
                AbiType::Tuple(items.iter().map(AbiValue::guess_type).collect::<Option<_>>()?)
            }
        })
    }
}

/// A Rust type that can be reconstructed from (and decomposed into) a
/// positional ABI tuple, playing the role of the "factory" the schema's
/// [`AbiType::Struct`] variant names.
pub trait AbiStruct: Sized {
    /// The struct's ABI name and field schema.
    fn abi_type() -> AbiType;

    /// Builds `Self` from its decoded field values, in declaration order.
    fn from_tuple(values: Vec<AbiValue>) -> Result<Self, crate::AbiError>;

    /// Decomposes `self` into its field values, in declaration order.
    fn into_tuple(self) -> Vec<AbiValue>;
}
