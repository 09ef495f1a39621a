//! NDR error types

use thiserror::Error;

/// Largest single allocation a decoder will make on behalf of wire data.
pub const MAX_NDR_ALLOCATION_SIZE: usize = 64 * 1024 * 1024;

/// Largest element count accepted for one conformant array.
pub const MAX_NDR_ARRAY_ELEMENTS: usize = 16 * 1024 * 1024;

/// NDR encoding/decoding errors
#[derive(Debug, Error)]
pub enum NdrError {
    /// Buffer underflow - not enough data
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// Declared element count cannot fit in the bytes that remain
    #[error("buffer overflow for size {size} of array {array}")]
    BufferOverflow { size: usize, array: String },

    /// Invalid string - bad framing or encoding
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// A `[ref]` pointer has no value to point at
    #[error("null value for [ref] pointer")]
    NullRefPointer,

    /// Invalid union discriminant
    #[error("invalid union discriminant {discriminant} for {union}")]
    InvalidDiscriminant { union: &'static str, discriminant: u32 },

    /// VARIANT type tag this codec does not carry
    #[error("unsupported variant type 0x{0:04x}")]
    UnsupportedVariantType(u16),

    /// Conformance mismatch
    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u32, actual_count: u32 },

    /// Encoded length field disagrees with the data that follows
    #[error("length mismatch in {field}: declared {declared}, actual {actual}")]
    LengthMismatch { field: &'static str, declared: usize, actual: usize },

    /// A count or size exceeds the decoder's allocation limits
    #[error("allocation limit exceeded: requested {requested}, limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    /// Count arithmetic overflowed
    #[error("integer overflow computing {0}")]
    IntegerOverflow(&'static str),

    /// A marshal/unmarshal pass ended with pointer bodies still queued
    #[error("{0} deferred pointer bodies were never flushed")]
    PendingDeferred(usize),

    /// A payload hook rejected the operation before marshalling
    #[error("payload hook failed: {0}")]
    Hook(String),

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16Error(#[from] std::char::DecodeUtf16Error),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
