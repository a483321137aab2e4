/// Errors that can occur while decoding RLP.
///
/// The decoder never panics on malformed input; every failure mode is a
/// variant here so callers get `Result`, not a partially-built value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RlpError {
    /// The buffer ended before the declared item length was satisfied.
    #[error("input too short")]
    InputTooShort,
    /// A string-prefixed byte was used to start an item, but a list header
    /// was expected (or vice versa).
    #[error("expected list, found string")]
    UnexpectedString,
    /// A list-prefixed byte was used to start an item, but a string header
    /// was expected.
    #[error("expected string, found list")]
    UnexpectedList,
    /// A length prefix used more bytes than necessary (e.g. a long-form
    /// header whose length would have fit in a short form).
    #[error("non-canonical length encoding")]
    NonCanonicalSize,
    /// A single-byte string in `[0x00, 0x7f]` was encoded as a length-1
    /// string with an explicit header instead of as itself.
    #[error("single byte below 0x80 encoded with a header")]
    NonCanonicalSingleByte,
    /// An integer encoding had a redundant leading zero byte.
    #[error("leading zero in integer encoding")]
    LeadingZero,
    /// The decoded integer doesn't fit in the requested fixed-width type.
    #[error("integer too large for target type")]
    Overflow,
    /// A fixed-size type (address, hash, ...) was decoded from a string of
    /// the wrong length.
    #[error("expected {expected} bytes, got {got}")]
    UnexpectedLength {
        /// Bytes expected for this fixed-width type.
        expected: usize,
        /// Bytes actually present in the decoded string.
        got: usize,
    },
    /// A list's declared payload length didn't match the sum of its
    /// children's encoded lengths.
    #[error("list length mismatch: expected {expected}, got {got}")]
    ListLengthMismatch {
        /// Declared payload length from the list header.
        expected: usize,
        /// Bytes actually consumed decoding the list's children.
        got: usize,
    },
    /// Trailing bytes remained after decoding a value that should have
    /// consumed the whole buffer.
    #[error("unconsumed trailing bytes")]
    TrailingBytes,
}

/// Convenience alias for RLP decode results.
pub type RlpResult<T> = Result<T, RlpError>;
