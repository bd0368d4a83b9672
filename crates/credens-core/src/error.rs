//! # Error Types
//!
//! Structured errors for the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations. Errors here are
//! programming-contract or input failures; verification *outcomes* are
//! values, defined in `credens-engine`, and never travel as errors.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JCS serialization failed (e.g. a map with non-string keys, or a
    /// non-finite float that JSON cannot represent).
    #[error("canonical serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a digest fingerprint token.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The one-character multibase prefix is not one we emit.
    #[error("unsupported fingerprint prefix: {0:?}")]
    UnsupportedPrefix(char),

    /// The fingerprint body is not valid base58btc.
    #[error("invalid base58 in fingerprint: {0}")]
    InvalidEncoding(String),

    /// The decoded hash has the wrong length for the algorithm.
    #[error("fingerprint decodes to {0} bytes, expected 32")]
    InvalidLength(usize),

    /// The fingerprint is empty.
    #[error("empty fingerprint")]
    Empty,
}

/// Error constructing or parsing a [`Timestamp`](crate::Timestamp).
#[derive(Error, Debug)]
pub enum TimestampError {
    /// The string is not valid RFC 3339, or uses a non-Z offset in strict mode.
    #[error("invalid timestamp {input:?}: {reason}")]
    Invalid {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The Unix epoch value is out of the representable range.
    #[error("epoch seconds out of range: {0}")]
    EpochOutOfRange(i64),
}
