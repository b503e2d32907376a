//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout tzkit. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Encoding errors carry the offending length or prefix so a malformed
//!   input can be diagnosed from the message alone.
//! - A checksum failure is its own variant, never folded into a generic
//!   parse error.
//! - Cryptographic verification failure (`SignatureMismatch`) is distinct
//!   from any decode error.
//! - `DecryptFailed` carries no detail at all.

use thiserror::Error;

/// Top-level error type for tzkit.
#[derive(Error, Debug)]
pub enum TzError {
    /// Text or binary decoding failed.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// A cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Error decoding or encoding a tagged value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The trailing 4-byte base58check checksum did not match the payload.
    #[error("base58check checksum mismatch")]
    ChecksumMismatch,

    /// The text is not valid base58 (bad character, output overflow).
    #[error("invalid base58 text: {0}")]
    InvalidBase58(String),

    /// No registry entry matches the text's length and prefix.
    #[error("unknown hash type for {0:?}")]
    UnknownHashType(String),

    /// Unknown address tag byte or address prefix.
    #[error("unknown address type: {0}")]
    UnknownAddressType(String),

    /// Unknown key tag byte or key prefix.
    #[error("unknown key type: {0}")]
    UnknownKeyType(String),

    /// Unknown signature tag byte, length, or prefix.
    #[error("unknown signature type: {0}")]
    UnknownSignatureType(String),

    /// Payload length does not match the registry entry.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually found.
        actual: usize,
    },

    /// Decoded version bytes do not match the expected kind's prefix.
    #[error("invalid prefix: expected {expected}, got {actual}")]
    InvalidPrefix {
        /// Hex of the expected version bytes.
        expected: String,
        /// Hex of the version bytes found.
        actual: String,
    },

    /// The input ended before a complete value was read.
    #[error("short buffer: {0}")]
    ShortBuffer(String),

    /// A decimal number string could not be parsed.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signature does not verify under the given key and digest.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// An encrypted secret key was supplied without a passphrase source.
    #[error("passphrase required")]
    PassphraseRequired,

    /// Decryption of an encrypted secret key failed.
    #[error("decryption failed")]
    DecryptFailed,

    /// Key bytes are not a valid point or scalar for the curve.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Signature bytes are structurally invalid for the curve.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The signing backend rejected the input.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The operation is not available for this curve.
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// A value could not be decoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl EncodingError {
    /// Build an `InvalidPrefix` from raw version bytes.
    pub fn invalid_prefix(expected: &[u8], actual: &[u8]) -> Self {
        Self::InvalidPrefix {
            expected: hex::encode(expected),
            actual: hex::encode(actual),
        }
    }
}
