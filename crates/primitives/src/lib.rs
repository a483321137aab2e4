//! Fixed-width byte values, hex codec, and signature primitives shared by
//! every layer of an EVM JSON-RPC client: the RLP and ABI codecs, the
//! typed-transaction model, and the JSON-RPC transport.

mod bytes_ext;
mod checksum;
mod fixed;
pub mod hex;
mod kind;
mod signature;

pub use bytes_ext::Bytes;
pub use fixed::{Address, Bloom, Hash, ParseFixedBytesError};
pub use kind::TxKind;
pub use signature::{Parity, Signature, SignatureError};

/// A 256-bit unsigned integer, used for `value`, signature scalars, and
/// other Ethereum quantities that can exceed 64 bits.
pub type U256 = ruint::aliases::U256;

/// A 64-bit unsigned integer, used for `nonce`, `gas`, block numbers, and
/// other "small" quantities in the Ethereum JSON-RPC schema.
pub type U64 = ruint::aliases::U64;

/// EIP-155 chain identifier.
pub type ChainId = u64;

/// Computes the keccak-256 digest of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash {
    use sha3::{Digest, Keccak256};
    let digest = Keccak256::digest(data.as_ref());
    Hash(digest.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_empty() {
        // keccak256("") is a well-known constant.
        let h = keccak256(b"");
        assert_eq!(h.to_string(), "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a47");
    }
}
