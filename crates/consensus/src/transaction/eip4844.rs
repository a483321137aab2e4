use super::{decode_vrs, encode_vrs, signature_from_y_parity, typed_y_parity, vrs_fields_len, Envelope, Transaction};
use crate::{access_list::AccessList, error::ConsensusError, tx_type::TxType};
use bytes::BufMut;
use chainrpc_primitives::{Address, Bytes, ChainId, Hash, Signature, TxKind, U256};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};

const BLOB_SIZE: usize = 131_072;
const KZG_ELEMENT_SIZE: usize = 48;

/// The KZG blob/commitment/proof data that travels alongside a blob
/// transaction over the network, but is excluded from the canonical
/// on-chain encoding and from the signature hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobSidecar {
    /// Raw blobs, each exactly 131072 bytes.
    pub blobs: Vec<Bytes>,
    /// KZG commitments, each exactly 48 bytes, one per blob.
    pub commitments: Vec<Bytes>,
    /// KZG proofs, each exactly 48 bytes, one per blob.
    pub proofs: Vec<Bytes>,
}

impl BlobSidecar {
    /// Validates element counts and sizes before constructing a sidecar.
    pub fn new(blobs: Vec<Bytes>, commitments: Vec<Bytes>, proofs: Vec<Bytes>) -> Result<Self, ConsensusError> {
        if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
            return Err(ConsensusError::SidecarLengthMismatch {
                blobs: blobs.len(),
                commitments: commitments.len(),
                proofs: proofs.len(),
            });
        }
        for blob in &blobs {
            if blob.len() != BLOB_SIZE {
                return Err(ConsensusError::WrongSidecarElementSize { expected: BLOB_SIZE, got: blob.len() });
            }
        }
        for element in commitments.iter().chain(proofs.iter()) {
            if element.len() != KZG_ELEMENT_SIZE {
                return Err(ConsensusError::WrongSidecarElementSize {
                    expected: KZG_ELEMENT_SIZE,
                    got: element.len(),
                });
            }
        }
        Ok(Self { blobs, commitments, proofs })
    }

    fn fields_len(&self) -> usize {
        self.blobs.length() + self.commitments.length() + self.proofs.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.blobs.encode(out);
        self.commitments.encode(out);
        self.proofs.encode(out);
    }
}

/// An EIP-4844 blob-carrying transaction. `to` is mandatory: blob
/// transactions cannot be contract creations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxEip4844 {
    /// Replay-protection chain id; mandatory for typed transactions.
    pub chain_id: ChainId,
    /// The sender's account nonce.
    pub nonce: u64,
    /// `maxPriorityFeePerGas`.
    pub gas_tip_cap: u128,
    /// `maxFeePerGas`.
    pub gas_fee_cap: u128,
    /// Maximum gas this transaction may consume.
    pub gas_limit: u64,
    /// The call target. Blob transactions cannot create contracts.
    pub to: Address,
    /// Wei transferred to `to`.
    pub value: U256,
    /// Call data.
    pub input: Bytes,
    /// Pre-declared touched addresses and storage keys.
    pub access_list: AccessList,
    /// `maxFeePerBlobGas`.
    pub blob_fee_cap: u128,
    /// Versioned hashes of the blobs this transaction commits to.
    pub blob_versioned_hashes: Vec<Hash>,
    /// The blob payload and KZG proofs, present only for locally-built or
    /// freshly-received transactions, never part of the canonical hash.
    pub sidecar: Option<BlobSidecar>,
}

impl TxEip4844 {
    /// Validates the blob-specific construction invariants: `gasFeeCap ≥
    /// gasTipCap`, and (when a sidecar is attached) matching, correctly
    /// sized blob/commitment/proof lists.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        if self.gas_fee_cap < self.gas_tip_cap {
            return Err(ConsensusError::BlobFeeCapBelowTipCap {
                fee_cap: self.gas_fee_cap,
                tip_cap: self.gas_tip_cap,
            });
        }
        if let Some(sidecar) = &self.sidecar {
            BlobSidecar::new(sidecar.blobs.clone(), sidecar.commitments.clone(), sidecar.proofs.clone())?;
        }
        Ok(())
    }

    fn fields_len(&self) -> usize {
        self.chain_id.length()
            + self.nonce.length()
            + self.gas_tip_cap.length()
            + self.gas_fee_cap.length()
            + self.gas_limit.length()
            + self.to.length()
            + self.value.length()
            + self.input.as_slice().length()
            + self.access_list.length()
            + self.blob_fee_cap.length()
            + self.blob_versioned_hashes.length()
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_id.encode(out);
        self.nonce.encode(out);
        self.gas_tip_cap.encode(out);
        self.gas_fee_cap.encode(out);
        self.gas_limit.encode(out);
        self.to.encode(out);
        self.value.encode(out);
        self.input.as_slice().encode(out);
        self.access_list.encode(out);
        self.blob_fee_cap.encode(out);
        self.blob_versioned_hashes.encode(out);
    }

    fn decode_fields(payload: &mut &[u8]) -> RlpResult<Self> {
        Ok(Self {
            chain_id: Decodable::decode(payload)?,
            nonce: Decodable::decode(payload)?,
            gas_tip_cap: Decodable::decode(payload)?,
            gas_fee_cap: Decodable::decode(payload)?,
            gas_limit: Decodable::decode(payload)?,
            to: Decodable::decode(payload)?,
            value: Decodable::decode(payload)?,
            input: Decodable::decode(payload)?,
            access_list: Decodable::decode(payload)?,
            blob_fee_cap: Decodable::decode(payload)?,
            blob_versioned_hashes: Decodable::decode(payload)?,
            sidecar: None,
        })
    }

    fn tx_payload_len(&self, signature: Option<&Signature>) -> usize {
        let payload_length = match signature {
            None => self.fields_len(),
            Some(sig) => self.fields_len() + vrs_fields_len(typed_y_parity(sig), sig),
        };
        Header { list: true, payload_length }.length() + payload_length
    }

    fn encode_tx_payload(&self, signature: Option<&Signature>, out: &mut dyn BufMut) {
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

    /// Decodes this type's signed RLP list (the bytes after the type byte
    /// has already been stripped by the caller). Only the canonical
    /// (sidecar-free) on-chain form is accepted; a sidecar never arrives
    /// over a path that calls this.
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

impl Transaction for TxEip4844 {
    fn tx_type(&self) -> TxType {
        TxType::Eip4844
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
        TxKind::Call(self.to)
    }
    fn value(&self) -> U256 {
        self.value
    }
    fn input(&self) -> &[u8] {
        &self.input
    }
}

impl Envelope for TxEip4844 {
    fn rlp_encode_enveloped(&self, signature: Option<&Signature>, hash_encoding: bool, out: &mut dyn BufMut) {
        out.put_u8(TxType::Eip4844.as_u8());
        let network_form = !hash_encoding && signature.is_some() && self.sidecar.is_some();
        if !network_form {
            self.encode_tx_payload(signature, out);
            return;
        }
        let sidecar = self.sidecar.as_ref().expect("checked above");
        let payload_length = self.tx_payload_len(signature) + sidecar.fields_len();
        Header { list: true, payload_length }.encode(out);
        self.encode_tx_payload(signature, out);
        sidecar.encode_fields(out);
    }

    fn rlp_enveloped_size(&self, signature: Option<&Signature>, hash_encoding: bool) -> usize {
        let network_form = !hash_encoding && signature.is_some() && self.sidecar.is_some();
        if !network_form {
            return 1 + self.tx_payload_len(signature);
        }
        let sidecar = self.sidecar.as_ref().expect("checked above");
        let payload_length = self.tx_payload_len(signature) + sidecar.fields_len();
        1 + Header { list: true, payload_length }.length() + payload_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> TxEip4844 {
        TxEip4844 {
            chain_id: 1,
            nonce: 1,
            gas_tip_cap: 1_000_000_000,
            gas_fee_cap: 2_000_000_000,
            gas_limit: 100_000,
            to: Address::from([0x22u8; 20]),
            value: U256::from(0u64),
            input: Bytes::new(),
            access_list: AccessList::default(),
            blob_fee_cap: 1,
            blob_versioned_hashes: vec![Hash::ZERO],
            sidecar: None,
        }
    }

    #[test]
    fn signature_hash_ignores_sidecar() {
        let without_sidecar = sample_tx();
        let mut with_sidecar = without_sidecar.clone();
        with_sidecar.sidecar = Some(
            BlobSidecar::new(
                vec![vec![0u8; BLOB_SIZE].into()],
                vec![vec![1u8; KZG_ELEMENT_SIZE].into()],
                vec![vec![2u8; KZG_ELEMENT_SIZE].into()],
            )
            .unwrap(),
        );
        assert_eq!(without_sidecar.signature_hash(), with_sidecar.signature_hash());
    }

    #[test]
    fn fee_cap_below_tip_cap_is_rejected() {
        let mut tx = sample_tx();
        tx.gas_tip_cap = 10;
        tx.gas_fee_cap = 5;
        assert!(matches!(tx.validate(), Err(ConsensusError::BlobFeeCapBelowTipCap { .. })));
    }

    #[test]
    fn wrong_blob_size_is_rejected() {
        let err = BlobSidecar::new(vec![vec![0u8; 10].into()], vec![vec![0u8; 48].into()], vec![vec![0u8; 48].into()])
            .unwrap_err();
        assert!(matches!(err, ConsensusError::WrongSidecarElementSize { .. }));
    }

    #[test]
    fn round_trips_canonical_signed_rlp() {
        let tx = sample_tx();
        let signature = Signature::new(U256::from(1u64), U256::from(2u64), 0);
        let mut buf = Vec::new();
        tx.rlp_encode_enveloped(Some(&signature), true, &mut buf);
        assert_eq!(buf.len(), tx.rlp_enveloped_size(Some(&signature), true));
        let (decoded, _) = TxEip4844::decode_signed(&mut &buf[1..]).unwrap();
        assert_eq!(decoded, tx);
    }
}
