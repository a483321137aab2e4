/// Errors from ABI encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// A value didn't match the shape its paired [`crate::AbiType`] expects
    /// (e.g. a `FixedBytes(32)` value with fewer than 32 bytes).
    #[error("type/value mismatch: {0}")]
    TypeMismatch(String),
    /// The buffer ended before a declared length/offset could be
    /// satisfied.
    #[error("input too short decoding {0}")]
    InputTooShort(&'static str),
    /// A dynamic-type offset pointed outside the tuple's own bytes, or
    /// would read past the end of the buffer.
    #[error("offset {offset} out of bounds (buffer length {len})")]
    OffsetOutOfBounds {
        /// The offset read from the head region.
        offset: usize,
        /// The total buffer length available.
        len: usize,
    },
    /// The tuple did not consume exactly its declared byte range.
    #[error("tuple did not consume its declared length: consumed {consumed}, expected {expected}")]
    TrailingOrMissingBytes {
        /// Bytes actually consumed.
        consumed: usize,
        /// Bytes the tuple was expected to consume.
        expected: usize,
    },
    /// A dynamic element's payload overlaps the head or another dynamic
    /// element's payload.
    #[error("dynamic payload at {start}..{end} overlaps previously claimed bytes")]
    OverlappingRegion {
        /// Start of the offending byte range.
        start: usize,
        /// End (exclusive) of the offending byte range.
        end: usize,
    },
    /// A `FixedBytes(N)` or numeric-width field used an out-of-range width.
    #[error("invalid width {0}")]
    InvalidWidth(u16),
    /// `from_tuple` was given the wrong number of values for a struct's
    /// field schema.
    #[error("expected {expected} struct fields, got {got}")]
    WrongFieldCount {
        /// Fields declared by the struct's schema.
        expected: usize,
        /// Values actually passed to `from_tuple`.
        got: usize,
    },
}
