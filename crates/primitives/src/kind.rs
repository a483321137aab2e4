use crate::Address;

/// The recipient of a transaction: a call to an existing account, or
/// contract creation when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TxKind {
    /// Contract creation.
    #[default]
    Create,
    /// A call (or plain transfer) to the given address.
    Call(Address),
}

impl TxKind {
    /// Returns the target address, or `None` for contract creation.
    pub const fn to(&self) -> Option<Address> {
        match self {
            Self::Create => None,
            Self::Call(addr) => Some(*addr),
        }
    }

    /// Returns `true` for contract creation.
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }
}

impl From<Option<Address>> for TxKind {
    fn from(value: Option<Address>) -> Self {
        match value {
            Some(addr) => Self::Call(addr),
            None => Self::Create,
        }
    }
}

impl From<Address> for TxKind {
    fn from(addr: Address) -> Self {
        Self::Call(addr)
    }
}
