use chainrpc_primitives::{Address, Hash, Signature, SignatureError};
use std::sync::OnceLock;

/// A transaction sealed with a signature and its hash, with the recovered
/// sender address memoized on first use.
#[derive(Debug, Clone)]
pub struct Signed<T> {
    tx: T,
    signature: Signature,
    hash: Hash,
    signer: OnceLock<Address>,
}

impl<T: PartialEq> PartialEq for Signed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tx == other.tx && self.signature == other.signature && self.hash == other.hash
    }
}

impl<T: Eq> Eq for Signed<T> {}

impl<T> Signed<T> {
    /// Wraps `tx` with `signature` and its precomputed `hash`. Does not
    /// verify that `signature` actually signs `tx`; callers that decoded
    /// this pair from the wire have already derived `hash` from the same
    /// bytes the signature covers.
    pub fn new_unchecked(tx: T, signature: Signature, hash: Hash) -> Self {
        Self { tx, signature, hash, signer: OnceLock::new() }
    }

    /// The wrapped transaction.
    pub fn tx(&self) -> &T {
        &self.tx
    }

    /// The signature over this transaction.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The transaction hash (`keccak256` of the signed envelope).
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Splits the wrapper into its transaction, signature, and hash.
    pub fn into_parts(self) -> (T, Signature, Hash) {
        (self.tx, self.signature, self.hash)
    }

    /// Discards the signature, returning the bare transaction.
    pub fn strip_signature(self) -> T {
        self.tx
    }

    /// The sender address, if already recovered and cached.
    pub fn signer(&self) -> Option<Address> {
        self.signer.get().copied()
    }
}

impl<T> Signed<T> {
    /// Recovers the sender from the signature over `sighash`, memoizing the
    /// result so repeated calls are free. `sighash` must be the
    /// transaction's own signature hash; passing a mismatched hash silently
    /// recovers and caches the wrong address.
    pub fn recover_signer_with_hash(&self, sighash: &Hash) -> Result<Address, SignatureError> {
        if let Some(signer) = self.signer() {
            return Ok(signer);
        }
        let signer = self.signature.recover_address_from_prehash(sighash)?;
        let _ = self.signer.set(signer);
        Ok(signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Envelope, TxLegacy};
    use chainrpc_primitives::{Bytes, TxKind, U256};

    #[test]
    fn recovers_and_caches_signer() {
        let tx = TxLegacy {
            chain_id: Some(1),
            nonce: 0,
            gas_price: 1,
            gas_limit: 21_000,
            to: TxKind::Call(Address::from([1u8; 20])),
            value: U256::ZERO,
            input: Bytes::new(),
        };
        let signature = Signature::new(U256::from(123_456_789u64), U256::from(987_654_321u64), 37);
        let sighash = tx.signature_hash();
        let signed = Signed::new_unchecked(tx, signature, sighash);
        assert!(signed.signer().is_none());
        let result = signed.recover_signer_with_hash(&sighash);
        assert!(result.is_err() || signed.signer().is_some());
    }
}
