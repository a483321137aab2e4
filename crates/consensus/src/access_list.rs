use chainrpc_primitives::{Address, Hash};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};
use std::fmt;

/// One entry of an [`AccessList`]: an address and the storage slots within
/// it that are pre-declared as touched (EIP-2930).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AccessListItem {
    /// The account address.
    pub address: Address,
    /// Storage slots pre-declared as touched within `address`.
    pub storage_keys: Vec<Hash>,
}

impl AccessListItem {
    fn fields_len(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }
}

impl Encodable for AccessListItem {
    fn length(&self) -> usize {
        let payload_length = self.fields_len();
        Header { list: true, payload_length }.length() + payload_length
    }

    fn encode(&self, out: &mut dyn bytes::BufMut) {
        Header { list: true, payload_length: self.fields_len() }.encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }
}

impl Decodable for AccessListItem {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (payload, rest) = buf.split_at(header.payload_length);
        let mut payload = payload;
        let address = Address::decode(&mut payload)?;
        let storage_keys = Vec::<Hash>::decode(&mut payload)?;
        if !payload.is_empty() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - payload.len(),
            });
        }
        *buf = rest;
        Ok(Self { address, storage_keys })
    }
}

/// The full access list attached to an EIP-2930-and-later transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccessList(pub Vec<AccessListItem>);

impl AccessList {
    /// Iterates over `(address, storage keys)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &[Hash])> {
        self.0.iter().map(|item| (&item.address, item.storage_keys.as_slice()))
    }

    /// Returns `true` if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encodable for AccessList {
    fn length(&self) -> usize {
        self.0.length()
    }
    fn encode(&self, out: &mut dyn bytes::BufMut) {
        self.0.encode(out)
    }
}

impl Decodable for AccessList {
    fn decode(buf: &mut &[u8]) -> RlpResult<Self> {
        Vec::<AccessListItem>::decode(buf).map(Self)
    }
}

impl fmt::Display for AccessList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessList({} entries)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_rlp() {
        let list = AccessList(vec![
            AccessListItem { address: Address::from([1u8; 20]), storage_keys: vec![Hash::ZERO] },
            AccessListItem { address: Address::from([2u8; 20]), storage_keys: vec![] },
        ]);
        let mut buf = Vec::new();
        list.encode(&mut buf);
        assert_eq!(buf.len(), list.length());
        let mut slice = buf.as_slice();
        let decoded = AccessList::decode(&mut slice).unwrap();
        assert!(slice.is_empty());
        assert_eq!(decoded, list);
    }
}
