//! Typed transactions: envelopes, signing, and sender recovery.
//!
//! This crate models the transaction types an EVM-compatible chain accepts
//! (legacy, EIP-2930, EIP-1559, EIP-4844, EIP-7702), their RLP envelopes,
//! and the [`Signed`] wrapper that seals a transaction with a signature and
//! its hash.

mod access_list;
mod authorization;
mod error;
mod signed;
mod transaction;
mod tx_type;

pub use access_list::{AccessList, AccessListItem};
pub use authorization::{Authorization, SignedAuthorization};
pub use error::ConsensusError;
pub use signed::Signed;
pub use transaction::{
    BlobSidecar, Envelope, Transaction, TxEip1559, TxEip2930, TxEip4844, TxEip7702, TxLegacy, TypedTransaction,
};
pub use tx_type::TxType;
