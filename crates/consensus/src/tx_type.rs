/// The EIP-2718 transaction type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    /// Pre-EIP-2718 legacy transaction.
    Legacy = 0,
    /// EIP-2930 access-list transaction.
    Eip2930 = 1,
    /// EIP-1559 dynamic-fee transaction.
    Eip1559 = 2,
    /// EIP-4844 blob transaction.
    Eip4844 = 3,
    /// EIP-7702 set-code transaction.
    Eip7702 = 4,
}

impl TxType {
    /// The single-byte EIP-2718 type prefix.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for [`TxType::Legacy`], which carries no type prefix.
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

impl TryFrom<u8> for TxType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Legacy),
            1 => Ok(Self::Eip2930),
            2 => Ok(Self::Eip1559),
            3 => Ok(Self::Eip4844),
            4 => Ok(Self::Eip7702),
            other => Err(other),
        }
    }
}

impl From<TxType> for u8 {
    fn from(ty: TxType) -> Self {
        ty.as_u8()
    }
}
