use chainrpc_primitives::SignatureError;

/// Errors constructing, encoding, or recovering the signer of a transaction.
#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// A typed (non-legacy) transaction was built with `chain_id == 0`.
    #[error("typed transactions require a positive chain id")]
    MissingChainId,
    /// A blob transaction was built with `to = Create`.
    #[error("blob transactions cannot be contract creations")]
    BlobRequiresRecipient,
    /// A blob transaction's fee cap was below its tip cap.
    #[error("blob gas fee cap ({fee_cap}) is below the tip cap ({tip_cap})")]
    BlobFeeCapBelowTipCap {
        /// `max_fee_per_blob_gas`.
        fee_cap: u128,
        /// `max_priority_fee_per_gas`.
        tip_cap: u128,
    },
    /// A blob, commitment, or proof did not have its mandated fixed size.
    #[error("blob sidecar element had the wrong size: expected {expected}, got {got}")]
    WrongSidecarElementSize {
        /// Mandated size (131072 for blobs, 48 for commitments/proofs).
        expected: usize,
        /// Size actually supplied.
        got: usize,
    },
    /// A blob sidecar's blob/commitment/proof lists had mismatched lengths.
    #[error("blob sidecar lists have mismatched lengths: {blobs} blobs, {commitments} commitments, {proofs} proofs")]
    SidecarLengthMismatch {
        /// Number of blobs.
        blobs: usize,
        /// Number of KZG commitments.
        commitments: usize,
        /// Number of KZG proofs.
        proofs: usize,
    },
    /// A set-code transaction was built with an empty authorization list.
    #[error("set-code transactions require a non-empty authorization list")]
    EmptyAuthorizationList,
    /// Attempted to sign, envelope-encode, or recover an unsupported
    /// (unknown-type) transaction.
    #[error("transaction type {0} is unsupported and cannot be signed or encoded")]
    UnsupportedType(u8),
    /// RLP decoding failed.
    #[error(transparent)]
    Rlp(#[from] chainrpc_rlp::RlpError),
    /// Signature recovery failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}
