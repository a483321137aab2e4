use super::{decode_vrs, encode_vrs, legacy_v, vrs_fields_len, Envelope, Transaction};
use crate::tx_type::TxType;
use bytes::BufMut;
use chainrpc_primitives::{Bytes, ChainId, Signature, TxKind, U256};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};

/// A pre-EIP-2718 legacy transaction, optionally EIP-155-protected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxLegacy {
    /// The replay-protection chain id (`None` predates EIP-155).
    pub chain_id: Option<ChainId>,
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
}

impl TxLegacy {
    fn fields_len(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.as_slice().length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.as_slice().encode(out);
    }

    fn decode_fields(payload: &mut &[u8]) -> RlpResult<Self> {
        Ok(Self {
            chain_id: None,
            nonce: Decodable::decode(payload)?,
            gas_price: Decodable::decode(payload)?,
            gas_limit: Decodable::decode(payload)?,
            to: Decodable::decode(payload)?,
            value: Decodable::decode(payload)?,
            input: Decodable::decode(payload)?,
        })
    }

    /// Decodes a legacy transaction's signed RLP list, recovering its
    /// EIP-155 chain id (if any) from the signature's `v`.
    pub fn decode_signed(buf: &mut &[u8]) -> RlpResult<(Self, Signature)> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(RlpError::UnexpectedString);
        }
        if buf.len() < header.payload_length {
            return Err(RlpError::InputTooShort);
        }
        let (mut payload, rest) = buf.split_at(header.payload_length);
        let mut tx = Self::decode_fields(&mut payload)?;
        let (v, r, s) = decode_vrs(&mut payload)?;
        if !payload.is_empty() {
            return Err(RlpError::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - payload.len(),
            });
        }
        let signature = Signature::new(r, s, v);
        let (_, chain_id) = signature.parity().map_err(|_| RlpError::Overflow)?;
        tx.chain_id = chain_id;
        *buf = rest;
        Ok((tx, signature))
    }
}

impl Transaction for TxLegacy {
    fn tx_type(&self) -> TxType {
        TxType::Legacy
    }
    fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
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

impl Envelope for TxLegacy {
    fn rlp_encode_enveloped(&self, signature: Option<&Signature>, _hash_encoding: bool, out: &mut dyn BufMut) {
        match signature {
            None => {
                let eip155_len = self.chain_id.map_or(0, |id| id.length() + 2);
                let payload_length = self.fields_len() + eip155_len;
                Header { list: true, payload_length }.encode(out);
                self.encode_fields(out);
                if let Some(id) = self.chain_id {
                    id.encode(out);
                    0u8.encode(out);
                    0u8.encode(out);
                }
            }
            Some(sig) => {
                let v = legacy_v(sig, self.chain_id);
                let payload_length = self.fields_len() + vrs_fields_len(v, sig);
                Header { list: true, payload_length }.encode(out);
                self.encode_fields(out);
                encode_vrs(v, sig, out);
            }
        }
    }

    fn rlp_enveloped_size(&self, signature: Option<&Signature>, _hash_encoding: bool) -> usize {
        let payload_length = match signature {
            None => self.fields_len() + self.chain_id.map_or(0, |id| id.length() + 2),
            Some(sig) => self.fields_len() + vrs_fields_len(legacy_v(sig, self.chain_id), sig),
        };
        Header { list: true, payload_length }.length() + payload_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainrpc_primitives::Address;

    #[test]
    fn signature_hash_with_and_without_eip155() {
        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::from([0x35u8; 20])),
            value: U256::from(1_000_000_000_000_000_000u128),
            input: Bytes::new(),
        };
        let hash_a = tx.signature_hash();
        let mut no_chain = tx.clone();
        no_chain.chain_id = None;
        let hash_b = no_chain.signature_hash();
        assert_ne!(hash_a, hash_b);
    }

    #[test]
    fn round_trips_signed_rlp() {
        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::from([0x35u8; 20])),
            value: U256::from(1u64),
            input: Bytes::new(),
        };
        let signature = Signature::new(U256::from(1u64), U256::from(2u64), 37);
        let mut buf = Vec::new();
        tx.rlp_encode_enveloped(Some(&signature), true, &mut buf);
        assert_eq!(buf.len(), tx.rlp_enveloped_size(Some(&signature), true));

        let (decoded, decoded_sig) = TxLegacy::decode_signed(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded_sig.r(), signature.r());
        assert_eq!(decoded.chain_id, Some(1));
    }
}
