//! ECDSA signatures over secp256k1, with Ethereum's `v`-encoding conventions.

use crate::{hex, Address, Hash, U256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

/// Error constructing, parsing, or recovering a [`Signature`].
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// `v` did not match any recognized recovery encoding.
    #[error("invalid recovery id encoding in v={0}")]
    InvalidRecoveryId(u64),
    /// The underlying secp256k1 operation failed (bad scalar, point not on
    /// curve, recovery failed, etc).
    #[error("ecdsa error: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),
    /// `decode_rsv` was given a slice that wasn't exactly 65 bytes.
    #[error("expected a 65-byte [r || s || v] array, got {0} bytes")]
    WrongLength(usize),
}

/// The recovery parity derived from a signature's `v` value.
///
/// `v` itself may use the electrum offset, EIP-155, or a raw 0/1 value; this
/// type normalizes all three down to the single bit that secp256k1
/// recovery actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parity(pub bool);

impl Parity {
    /// Decodes `v` under one of three conventions:
    /// - raw parity: `0` or `1`
    /// - "electrum" offset: `27` or `28`
    /// - EIP-155: `35 + 2*chain_id + parity`
    ///
    /// Returns the parity bit and, for the EIP-155 form, the recovered
    /// chain id.
    pub fn decode_v(v: u64) -> Result<(Self, Option<u64>), SignatureError> {
        match v {
            0 | 1 => Ok((Self(v == 1), None)),
            27 | 28 => Ok((Self(v == 28), None)),
            v if v >= 35 => {
                let parity = (v - 35) % 2;
                let chain_id = (v - 35 - parity) / 2;
                Ok((Self(parity == 1), Some(chain_id)))
            }
            other => Err(SignatureError::InvalidRecoveryId(other)),
        }
    }

    /// Encodes this parity using the electrum offset (`27`/`28`).
    pub const fn to_electrum_v(self) -> u64 {
        27 + self.0 as u64
    }

    /// Encodes this parity under EIP-155 for the given chain id.
    pub const fn to_eip155_v(self, chain_id: u64) -> u64 {
        35 + 2 * chain_id + self.0 as u64
    }
}

/// An ECDSA signature `(r, s, v)` over secp256k1.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: U256,
    s: U256,
    v: u64,
}

impl Signature {
    /// Builds a signature from raw scalars and a raw `v` (any recognized
    /// encoding).
    pub fn new(r: U256, s: U256, v: u64) -> Self {
        Self { r, s, v }
    }

    /// The `r` scalar.
    pub const fn r(&self) -> U256 {
        self.r
    }

    /// The `s` scalar.
    pub const fn s(&self) -> U256 {
        self.s
    }

    /// The raw `v` value, exactly as constructed (not normalized).
    pub const fn v(&self) -> u64 {
        self.v
    }

    /// Decodes this signature's recovery parity and, if `v` was EIP-155
    /// encoded, the chain id it was bound to.
    pub fn parity(&self) -> Result<(Parity, Option<u64>), SignatureError> {
        Parity::decode_v(self.v)
    }

    /// Serializes as a 65-byte `[r (32) || s (32) || v (1)]` array, with `v`
    /// normalized to the electrum form (`27`/`28`).
    pub fn to_rsv_bytes(&self) -> [u8; 65] {
        let (parity, _) = self.parity().expect("signature constructed with invalid v");
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = parity.to_electrum_v() as u8;
        out
    }

    /// Parses a 65-byte `[r || s || v]` array (any `v` encoding accepted).
    pub fn from_rsv_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != 65 {
            return Err(SignatureError::WrongLength(bytes.len()));
        }
        let r = U256::from_be_slice(&bytes[..32]);
        let s = U256::from_be_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] as u64 })
    }

    /// Recovers the signer's [`Address`] from the 32-byte pre-image hash
    /// this signature was computed over.
    pub fn recover_address_from_prehash(&self, prehash: &Hash) -> Result<Address, SignatureError> {
        let (parity, _) = self.parity()?;
        let sig = K256Signature::from_scalars(self.r.to_be_bytes::<32>(), self.s.to_be_bytes::<32>())?;
        let recovery_id = RecoveryId::new(parity.0, false);
        let verifying_key =
            VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recovery_id)?;

        let encoded = verifying_key.to_encoded_point(false);
        let hash = Keccak256::digest(&encoded.as_bytes()[1..]);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Ok(Address(addr))
    }
}

impl core::fmt::Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signature")
            .field("r", &self.r)
            .field("s", &self.s)
            .field("v", &self.v)
            .finish()
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.to_rsv_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_encodings_agree_on_parity() {
        assert_eq!(Parity::decode_v(0).unwrap().0 .0, false);
        assert_eq!(Parity::decode_v(1).unwrap().0 .0, true);
        assert_eq!(Parity::decode_v(27).unwrap().0 .0, false);
        assert_eq!(Parity::decode_v(28).unwrap().0 .0, true);
        let (parity, chain_id) = Parity::decode_v(37).unwrap();
        assert_eq!(chain_id, Some(1));
        assert!(parity.0);
    }

    #[test]
    fn rejects_invalid_v() {
        assert!(Parity::decode_v(2).is_err());
        assert!(Parity::decode_v(26).is_err());
        assert!(Parity::decode_v(34).is_err());
    }

    #[test]
    fn rsv_round_trip_normalizes_v() {
        let sig = Signature::new(U256::from(1u64), U256::from(2u64), 1);
        let bytes = sig.to_rsv_bytes();
        assert_eq!(bytes[64], 28);
        let back = Signature::from_rsv_bytes(&bytes).unwrap();
        assert_eq!(back.r(), sig.r());
        assert_eq!(back.s(), sig.s());
    }

    #[test]
    fn sign_and_recover() {
        use k256::ecdsa::SigningKey;

        let signing_key = SigningKey::from_slice(&[7u8; 32]).unwrap();
        let msg = Keccak256::digest(b"hello world");
        let prehash: [u8; 32] = msg.into();

        let (sig, recid): (K256Signature, RecoveryId) =
            signing_key.sign_prehash_recoverable(&prehash).unwrap();
        let signature = Signature::new(
            U256::from_be_slice(&sig.r().to_bytes()),
            U256::from_be_slice(&sig.s().to_bytes()),
            recid.to_byte() as u64,
        );

        let expected_pubkey = signing_key.verifying_key();
        let encoded = expected_pubkey.to_encoded_point(false);
        let hash = Keccak256::digest(&encoded.as_bytes()[1..]);
        let mut expected_addr = [0u8; 20];
        expected_addr.copy_from_slice(&hash[12..]);

        let recovered = signature.recover_address_from_prehash(&Hash(prehash)).unwrap();
        assert_eq!(recovered, Address(expected_addr));
    }
}
