use super::{decode_vrs, encode_vrs, signature_from_y_parity, typed_y_parity, vrs_fields_len, Envelope, Transaction};
use crate::{access_list::AccessList, tx_type::TxType};
use bytes::BufMut;
use chainrpc_primitives::{Bytes, ChainId, Signature, TxKind, U256};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};

/// An EIP-2930 transaction carrying a pre-declared access list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxEip2930 {
    /// Replay-protection chain id; mandatory for typed transactions.
    pub chain_id: ChainId,
    /// The sender's account nonce.
    pub nonce: u64,
    /// Wei paid per unit of gas.
    pub gas_price: u128,
    /// Maximum gas this transaction may consume.
    pub gas_limit: u64,
    /// The call target, or contract creation.
    pub to: TxKind,
    /// Wei transferred to `to`.
    pub value: U256,
    /// Call data or init code.
    pub input: Bytes,
    /// Pre-declared touched addresses and storage keys.
    pub access_list: AccessList,
}

impl TxEip2930 {
    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.as_slice().length()
            + self.access_list.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.as_slice().encode(out);
        self.access_list.encode(out);
    }

    fn decode_fields(payload: &mut &[u8]) -> RlpResult<Self> {
        Ok(Self {
            chain_id: Decodable::decode(payload)?,
            nonce: Decodable::decode(payload)?,
            gas_price: Decodable::decode(payload)?,
            gas_limit: Decodable::decode(payload)?,
            to: Decodable::decode(payload)?,
            value: Decodable::decode(payload)?,
            input: Decodable::decode(payload)?,
            access_list: Decodable::decode(payload)?,
        })
    }

    /// Decodes this type's signed RLP list (the bytes after the type byte
    /// has already been stripped by the caller).
    pub fn decode_signed(buf: &mut &[u8]) -> RlpResult<(Self, Signature)> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        let tx = Self::decode_fields(&mut payload)?;
        let (y_parity, r, s) = decode_vrs(&mut payload)?;
        if !payload.is_empty() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - payload.len(),
            });
        }
        *buf = rest;
        Ok((tx, signature_from_y_parity(y_parity, r, s)))
    }
}

impl Transaction for TxEip2930 {
    fn tx_type(&self) -> TxType {
        TxType::Eip2930
    }
    fn chain_id(&self) -> Option<ChainId> {
        Some(self.chain_id)
    }
    fn nonce(&self) -> u64 {
        self.nonce
    }
    fn gas_limit(&self) -> u64 {
        self.gas_limit
    }
    fn to(&self) -> TxKind {
        self.to
    }
    fn value(&self) -> U256 {
        self.value
    }
    fn input(&self) -> &[u8] {
        &self.input
    }
}

impl Envelope for TxEip2930 {
    fn rlp_encode_enveloped(&self, signature: Option<&Signature>, _hash_encoding: bool, out: &mut dyn BufMut) {
        out.put_u8(TxType::Eip2930.as_u8());
        match signature {
            None => {
                Header { list: true, payload_length: self.fields_len() }.encode(out);
                self.encode_fields(out);
            }
            Some(sig) => {
                let y_parity = typed_y_parity(sig);
                let payload_length = self.fields_len() + vrs_fields_len(y_parity, sig);
                Header { list: true, payload_length }.encode(out);
                self.encode_fields(out);
                encode_vrs(y_parity, sig, out);
            }
        }
    }

    fn rlp_enveloped_size(&self, signature: Option<&Signature>, _hash_encoding: bool) -> usize {
        let payload_length = match signature {
            None => self.fields_len(),
            Some(sig) => self.fields_len() + vrs_fields_len(typed_y_parity(sig), sig),
        };
        1 + Header { list: true, payload_length }.length() + payload_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrpc_primitives::Address;

    #[test]
    fn round_trips_signed_rlp() {
        let tx = TxEip2930 {
            chain_id: 1,
            nonce: 5,
            gas_price: 10_000_000_000,
            gas_limit: 50_000,
            to: TxKind::Call(Address::from([0x11u8; 20])),
            value: U256::from(0u64),
            input: Bytes::new(),
            access_list: AccessList::default(),
        };
        let signature = Signature::new(U256::from(3u64), U256::from(4u64), 1);
        let mut buf = Vec::new();
        tx.rlp_encode_enveloped(Some(&signature), true, &mut buf);
        assert_eq!(buf.len(), tx.rlp_enveloped_size(Some(&signature), true));
        assert_eq!(buf[0], 1);

        let (decoded, decoded_sig) = TxEip2930::decode_signed(&mut &buf[1..]).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded_sig.s(), signature.s());
    }
}
