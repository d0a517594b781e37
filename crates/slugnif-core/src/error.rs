//! Marshaling error types.

/// Reasons a term could not be decoded into a bounded buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The term is not a proper list of integers.
    #[error("not a string term: {found}")]
    NotAString { found: String },

    /// A code point is outside the single-byte range.
    #[error("code point {value} is outside the Latin-1 range 0..=255")]
    OutOfRange { value: i64 },

    /// A NUL code point cannot cross a NUL-terminated boundary.
    #[error("NUL code point at index {index}")]
    InteriorNul { index: usize },

    /// The string does not fit in the buffer with its terminator.
    #[error("string of length {len} does not fit buffer of capacity {capacity}")]
    TooLong { len: usize, capacity: usize },
}

/// Reasons a byte sequence could not be encoded as a term.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A NUL byte inside what should be a NUL-terminated string.
    #[error("NUL byte at index {index}")]
    InteriorNul { index: usize },
}
