//! Typed transactions and the envelope/signing contract they share.

mod eip1559;
mod eip2930;
mod eip4844;
mod eip7702;
mod legacy;

pub use eip1559::TxEip1559;
pub use eip2930::TxEip2930;
pub use eip4844::{BlobSidecar, TxEip4844};
pub use eip7702::TxEip7702;
pub use legacy::TxLegacy;

use crate::{error::ConsensusError, signed::Signed, tx_type::TxType};
use bytes::BufMut;
use chainrpc_primitives::{keccak256, Bytes, ChainId, Hash, Parity, Signature, TxKind, U256};
use chainrpc_rlp::{Decodable, Encodable, Header, RlpError, RlpResult};

/// Read-only accessors shared by every transaction type, typed and legacy
/// alike.
pub trait Transaction {
    /// This transaction's EIP-2718 type identifier.
    fn tx_type(&self) -> TxType;
    /// The chain this transaction is bound to, if any (legacy transactions
    /// signed before EIP-155 have none).
    fn chain_id(&self) -> Option<ChainId>;
    /// The sender's account nonce at the time of signing.
    fn nonce(&self) -> u64;
    /// The gas limit.
    fn gas_limit(&self) -> u64;
    /// The call target, or [`TxKind::Create`] for contract creation.
    fn to(&self) -> TxKind;
    /// The wei value transferred.
    fn value(&self) -> U256;
    /// The call data (or init code, for contract creation).
    fn input(&self) -> &[u8];

    /// Whether this transaction has enough gas and a non-negative nonce to
    /// be considered fillable from a call request.
    fn is_fillable(&self) -> bool {
        self.gas_limit() >= 21_000
    }
}

fn legacy_v(signature: &Signature, chain_id: Option<ChainId>) -> u64 {
    let (parity, _) = signature.parity().expect("transaction signed with a valid v");
    match chain_id {
        Some(id) => parity.to_eip155_v(id),
        None => parity.to_electrum_v(),
    }
}

fn typed_y_parity(signature: &Signature) -> u64 {
    let (parity, _) = signature.parity().expect("transaction signed with a valid v");
    parity.0 as u64
}

fn vrs_fields_len(v: u64, signature: &Signature) -> usize {
    v.length() + signature.r().length() + signature.s().length()
}

fn encode_vrs(v: u64, signature: &Signature, out: &mut dyn BufMut) {
    v.encode(out);
    signature.r().encode(out);
    signature.s().encode(out);
}

fn decode_vrs(buf: &mut &[u8]) -> RlpResult<(u64, U256, U256)> {
    Ok((u64::decode(buf)?, U256::decode(buf)?, U256::decode(buf)?))
}

/// The envelope/signing contract described for each transaction type: how
/// it lays out its signature-hash preimage, its signed wire form, and the
/// transaction hash derived from that wire form.
pub trait Envelope: Transaction + Sized {
    /// Writes this transaction's enveloped RLP form.
    ///
    /// `signature` is `None` when computing the signature hash preimage.
    /// `hash_encoding` selects the canonical/hashing form over the
    /// network-broadcast form where they differ (blob transactions only).
    fn rlp_encode_enveloped(&self, signature: Option<&Signature>, hash_encoding: bool, out: &mut dyn BufMut);

    /// The exact byte length [`Envelope::rlp_encode_enveloped`] will write
    /// for the same arguments.
    fn rlp_enveloped_size(&self, signature: Option<&Signature>, hash_encoding: bool) -> usize;

    /// `keccak256` of this transaction's unsigned, hash-encoded envelope:
    /// the pre-image a signer signs over.
    fn signature_hash(&self) -> Hash {
        let size = self.rlp_enveloped_size(None, true);
        let mut buf = Vec::with_capacity(size);
        self.rlp_encode_enveloped(None, true, &mut buf);
        keccak256(buf)
    }

    /// Attaches `signature`, producing a [`Signed`] wrapper whose hash is
    /// `keccak256` of the signed, hash-encoded envelope.
    fn into_signed(self, signature: Signature) -> Signed<Self> {
        let size = self.rlp_enveloped_size(Some(&signature), true);
        let mut buf = Vec::with_capacity(size);
        self.rlp_encode_enveloped(Some(&signature), true, &mut buf);
        let hash = keccak256(&buf);
        Signed::new_unchecked(self, signature, hash)
    }
}

/// A transaction of any supported type, or an unrecognized EIP-2718 type
/// preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedTransaction {
    /// Pre-EIP-2718 legacy transaction.
    Legacy(TxLegacy),
    /// EIP-2930 access-list transaction.
    Eip2930(TxEip2930),
    /// EIP-1559 dynamic-fee transaction.
    Eip1559(TxEip1559),
    /// EIP-4844 blob transaction.
    Eip4844(TxEip4844),
    /// EIP-7702 set-code transaction.
    Eip7702(TxEip7702),
    /// A transaction of an EIP-2718 type this library doesn't model. It can
    /// be received and its type byte inspected, but never constructed,
    /// signed, or re-encoded.
    Unsupported {
        /// The unrecognized EIP-2718 type byte.
        ty: u8,
        /// The raw bytes that followed the type byte.
        raw: Bytes,
    },
}

impl TypedTransaction {
    /// This transaction's type byte, including for [`Self::Unsupported`].
    pub fn ty(&self) -> u8 {
        match self {
            Self::Legacy(_) => TxType::Legacy.as_u8(),
            Self::Eip2930(_) => TxType::Eip2930.as_u8(),
            Self::Eip1559(_) => TxType::Eip1559.as_u8(),
            Self::Eip4844(_) => TxType::Eip4844.as_u8(),
            Self::Eip7702(_) => TxType::Eip7702.as_u8(),
            Self::Unsupported { ty, .. } => *ty,
        }
    }

    /// Computes the signature hash, or [`ConsensusError::UnsupportedType`]
    /// for an [`Self::Unsupported`] transaction.
    pub fn signature_hash(&self) -> Result<Hash, ConsensusError> {
        Ok(match self {
            Self::Legacy(tx) => tx.signature_hash(),
            Self::Eip2930(tx) => tx.signature_hash(),
            Self::Eip1559(tx) => tx.signature_hash(),
            Self::Eip4844(tx) => tx.signature_hash(),
            Self::Eip7702(tx) => tx.signature_hash(),
            Self::Unsupported { ty, .. } => return Err(ConsensusError::UnsupportedType(*ty)),
        })
    }

    /// Attaches a signature, or fails for an [`Self::Unsupported`]
    /// transaction.
    pub fn into_signed(self, signature: Signature) -> Result<Signed<TypedTransaction>, ConsensusError> {
        macro_rules! seal {
            ($tx:expr) => {{
                let size = $tx.rlp_enveloped_size(Some(&signature), true);
                let mut buf = Vec::with_capacity(size);
                $tx.rlp_encode_enveloped(Some(&signature), true, &mut buf);
                keccak256(buf)
            }};
        }
        let hash = match &self {
            Self::Legacy(tx) => seal!(tx),
            Self::Eip2930(tx) => seal!(tx),
            Self::Eip1559(tx) => seal!(tx),
            Self::Eip4844(tx) => seal!(tx),
            Self::Eip7702(tx) => seal!(tx),
            Self::Unsupported { ty, .. } => return Err(ConsensusError::UnsupportedType(*ty)),
        };
        Ok(Signed::new_unchecked(self, signature, hash))
    }

    /// Encodes this transaction's EIP-2718-framed, signed wire form
    /// (network broadcast encoding, which for blob transactions differs
    /// from the canonical/hash-encoding form).
    pub fn encode_signed(&self, signature: &Signature, out: &mut dyn BufMut) {
        match self {
            Self::Legacy(tx) => tx.rlp_encode_enveloped(Some(signature), false, out),
            Self::Eip2930(tx) => tx.rlp_encode_enveloped(Some(signature), false, out),
            Self::Eip1559(tx) => tx.rlp_encode_enveloped(Some(signature), false, out),
            Self::Eip4844(tx) => tx.rlp_encode_enveloped(Some(signature), false, out),
            Self::Eip7702(tx) => tx.rlp_encode_enveloped(Some(signature), false, out),
            Self::Unsupported { ty, raw } => {
                out.put_u8(*ty);
                out.put_slice(raw.as_slice());
            }
        }
    }

    /// Decodes an EIP-2718-framed transaction: a single leading type byte
    /// for typed transactions, or an RLP list header directly for legacy.
    /// Returns the decoded transaction alongside its signature.
    pub fn decode_signed(buf: &mut &[u8]) -> RlpResult<(Self, Signature)> {
        let Some(&first) = buf.first() else { return Err(RlpError::InputTooShort) };
        if first >= 0xc0 {
            let (tx, sig) = TxLegacy::decode_signed(buf)?;
            return Ok((Self::Legacy(tx), sig));
        }

        let ty = first;
        let mut rest = &buf[1..];
        let decoded = match TxType::try_from(ty) {
            Ok(TxType::Eip2930) => {
                let (tx, sig) = TxEip2930::decode_signed(&mut rest)?;
                (Self::Eip2930(tx), sig)
            }
            Ok(TxType::Eip1559) => {
                let (tx, sig) = TxEip1559::decode_signed(&mut rest)?;
                (Self::Eip1559(tx), sig)
            }
            Ok(TxType::Eip4844) => {
                let (tx, sig) = TxEip4844::decode_signed(&mut rest)?;
                (Self::Eip4844(tx), sig)
            }
            Ok(TxType::Eip7702) => {
                let (tx, sig) = TxEip7702::decode_signed(&mut rest)?;
                (Self::Eip7702(tx), sig)
            }
            Ok(TxType::Legacy) | Err(_) => {
                let raw: Bytes = rest.to_vec().into();
                *buf = &[];
                return Ok((
                    Self::Unsupported { ty, raw },
                    Signature::new(U256::ZERO, U256::ZERO, 27),
                ));
            }
        };
        *buf = rest;
        Ok(decoded)
    }
}

impl Transaction for TypedTransaction {
    fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip2930(_) => TxType::Eip2930,
            Self::Eip1559(_) => TxType::Eip1559,
            Self::Eip4844(_) => TxType::Eip4844,
            Self::Eip7702(_) => TxType::Eip7702,
            Self::Unsupported { .. } => TxType::Legacy,
        }
    }

    fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::Eip2930(tx) => Some(tx.chain_id),
            Self::Eip1559(tx) => Some(tx.chain_id),
            Self::Eip4844(tx) => Some(tx.chain_id),
            Self::Eip7702(tx) => Some(tx.chain_id),
            Self::Unsupported { .. } => None,
        }
    }

    fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::Eip2930(tx) => tx.nonce,
            Self::Eip1559(tx) => tx.nonce,
            Self::Eip4844(tx) => tx.nonce,
            Self::Eip7702(tx) => tx.nonce,
            Self::Unsupported { .. } => 0,
        }
    }

    fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::Eip2930(tx) => tx.gas_limit,
            Self::Eip1559(tx) => tx.gas_limit,
            Self::Eip4844(tx) => tx.gas_limit,
            Self::Eip7702(tx) => tx.gas_limit,
            Self::Unsupported { .. } => 0,
        }
    }

    fn to(&self) -> TxKind {
        match self {
            Self::Legacy(tx) => tx.to,
            Self::Eip2930(tx) => tx.to,
            Self::Eip1559(tx) => tx.to,
            Self::Eip4844(tx) => TxKind::Call(tx.to),
            Self::Eip7702(tx) => TxKind::Call(tx.to),
            Self::Unsupported { .. } => TxKind::Create,
        }
    }

    fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.value,
            Self::Eip2930(tx) => tx.value,
            Self::Eip1559(tx) => tx.value,
            Self::Eip4844(tx) => tx.value,
            Self::Eip7702(tx) => tx.value,
            Self::Unsupported { .. } => U256::ZERO,
        }
    }

    fn input(&self) -> &[u8] {
        match self {
            Self::Legacy(tx) => &tx.input,
            Self::Eip2930(tx) => &tx.input,
            Self::Eip1559(tx) => &tx.input,
            Self::Eip4844(tx) => &tx.input,
            Self::Eip7702(tx) => &tx.input,
            Self::Unsupported { raw, .. } => raw.as_slice(),
        }
    }
}

/// Reconstructs the canonical electrum-style `v` byte that [`Parity`]
/// encodes to for a signature whose recovery bit was decoded as raw
/// `y_parity`.
pub(crate) fn signature_from_y_parity(y_parity: u64, r: U256, s: U256) -> Signature {
    Signature::new(r, s, Parity(y_parity == 1).to_electrum_v())
}
