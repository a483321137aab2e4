use std::fmt;

/// A Solidity ABI v2 type, as recognized by the encoder/decoder.
///
/// These are the only variants the codec understands; there is no open
/// extension point, matching the closed set of Solidity primitive and
/// composite types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    /// `address`.
    Address,
    /// `bool`.
    Bool,
    /// `bytesN`, `1 <= N <= 32`.
    FixedBytes(u8),
    /// `bytes`.
    Bytes,
    /// `string`.
    String,
    /// `uintN`, `N` in `{8, 16, ..., 256}`.
    UInt(u16),
    /// `intN`, `N` in `{8, 16, ..., 256}`.
    Int(u16),
    /// `T[N]`.
    FixedArray(usize, Box<AbiType>),
    /// `T[]`.
    Array(Box<AbiType>),
    /// `(T1, T2, ...)`.
    Tuple(Vec<AbiType>),
    /// A named tuple reconstructed through a factory after decoding; for
    /// encoding purposes it behaves exactly like [`AbiType::Tuple`].
    Struct {
        /// The struct's name, used only for its canonical signature.
        name: String,
        /// The field types, in declaration order.
        fields: Vec<AbiType>,
    },
}

impl AbiType {
    /// Convenience constructor for `uint256`.
    pub const fn uint256() -> Self {
        Self::UInt(256)
    }

    /// Convenience constructor for `int256`.
    pub const fn int256() -> Self {
        Self::Int(256)
    }

    /// Returns `true` if this type occupies a fixed 32-byte head slot
    /// (i.e. encodes with no tail pointer).
    pub fn is_static(&self) -> bool {
        match self {
            Self::Address | Self::Bool | Self::FixedBytes(_) | Self::UInt(_) | Self::Int(_) => {
                true
            }
            Self::Bytes | Self::String | Self::Array(_) => false,
            Self::FixedArray(_, inner) => inner.is_static(),
            Self::Tuple(fields) => fields.iter().all(AbiType::is_static),
            Self::Struct { fields, .. } => fields.iter().all(AbiType::is_static),
        }
    }

    /// The number of 32-byte head words this type occupies when it is
    /// static. Dynamic types always occupy exactly one (the tail pointer).
    pub fn head_words(&self) -> usize {
        match self {
            Self::FixedArray(n, inner) if inner.is_static() => n * inner.head_words(),
            Self::Tuple(fields) if self.is_static() => {
                fields.iter().map(AbiType::head_words).sum()
            }
            Self::Struct { fields, .. } if self.is_static() => {
                fields.iter().map(AbiType::head_words).sum()
            }
            _ => 1,
        }
    }

    /// The canonical type name used in function/event signatures, with
    /// tuples and structs expanded recursively to their parenthesized
    /// component list.
    pub fn canonical(&self) -> String {
        match self {
            Self::Address => "address".to_owned(),
            Self::Bool => "bool".to_owned(),
            Self::FixedBytes(n) => format!("bytes{n}"),
            Self::Bytes => "bytes".to_owned(),
            Self::String => "string".to_owned(),
            Self::UInt(bits) => format!("uint{bits}"),
            Self::Int(bits) => format!("int{bits}"),
            Self::FixedArray(n, inner) => format!("{}[{n}]", inner.canonical()),
            Self::Array(inner) => format!("{}[]", inner.canonical()),
            Self::Tuple(fields) | Self::Struct { fields, .. } => {
                let parts: Vec<String> = fields.iter().map(AbiType::canonical).collect();
                format!("({})", parts.join(","))
            }
        }
    }

    pub(crate) fn fields(&self) -> Option<&[AbiType]> {
        match self {
            Self::Tuple(fields) | Self::Struct { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Builds the canonical signature `name(type,type,...)` for a function or
/// event, expanding tuple fields recursively.
pub fn canonical_signature(name: &str, params: &[AbiType]) -> String {
    let parts: Vec<String> = params.iter().map(AbiType::canonical).collect();
    format!("{name}({})", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_classification() {
        assert!(AbiType::Address.is_static());
        assert!(AbiType::FixedBytes(32).is_static());
        assert!(!AbiType::Bytes.is_static());
        assert!(!AbiType::String.is_static());
        assert!(!AbiType::Array(Box::new(AbiType::UInt(256))).is_static());
        assert!(AbiType::FixedArray(3, Box::new(AbiType::UInt(256))).is_static());
        assert!(!AbiType::FixedArray(3, Box::new(AbiType::Bytes)).is_static());
        assert!(AbiType::Tuple(vec![AbiType::Address, AbiType::Bool]).is_static());
        assert!(!AbiType::Tuple(vec![AbiType::Address, AbiType::String]).is_static());
    }

    #[test]
    fn canonical_names() {
        assert_eq!(AbiType::UInt(256).canonical(), "uint256");
        assert_eq!(
            AbiType::Array(Box::new(AbiType::Address)).canonical(),
            "address[]"
        );
        let t = AbiType::Tuple(vec![AbiType::UInt(256), AbiType::Bool]);
        assert_eq!(t.canonical(), "(uint256,bool)");
        assert_eq!(canonical_signature("transfer", &[AbiType::Address, AbiType::UInt(256)]), "transfer(address,uint256)");
    }
}
