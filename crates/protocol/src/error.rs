//! Wire-format errors
//!
//! Every failure at this layer is a local, recoverable-by-caller condition
//! raised synchronously at the point of violation. Parsing is all-or-nothing:
//! either a fully valid structure is produced or an error is returned and no
//! partial state escapes.

use thiserror::Error;

/// NanoTDF wire-format errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Resource locator could not be decoded (bad nibble, short buffer,
    /// oversized body, non-UTF-8 body on URL reconstruction)
    #[error("malformed resource locator: {0}")]
    MalformedLocator(String),

    /// URL scheme is neither `http://` nor `https://`
    #[error("unsupported protocol scheme: {0}")]
    UnsupportedProtocol(String),

    /// Locator identifier length outside {0, 2, 8, 32}
    #[error("invalid identifier length: {0} (expected 0, 2, 8 or 32)")]
    InvalidIdentifierLength(usize),

    /// Curve nibble outside the defined range
    #[error("unsupported ECC curve: 0x{0:X}")]
    UnsupportedCurve(u8),

    /// Cipher nibble outside the defined range
    #[error("unsupported symmetric cipher: 0x{0:X}")]
    UnsupportedCipher(u8),

    /// First three bytes of the input are not the NanoTDF magic/version
    #[error("invalid magic number and version: {} (expected 4C314C)", hex_magic(.0))]
    BadMagicNumber([u8; 3]),

    /// Input ended before a structure was fully decoded
    #[error("truncated input: needed {needed} more bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// Caller-provided output buffer is shorter than the serialized form
    #[error("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// Policy binding is empty at serialization time
    #[error("policy binding is missing")]
    MissingBinding,

    /// Policy type byte is unknown, or names the embedded-encrypted-with-key-access
    /// variant, which is deliberately unimplemented and fails closed
    #[error("unsupported policy variant: 0x{0:02X}")]
    UnsupportedPolicyVariant(u8),

    /// Variant-checked policy accessor called on the wrong variant
    #[error("wrong policy variant: expected {expected}, got {actual}")]
    WrongPolicyVariant {
        expected: &'static str,
        actual: &'static str,
    },

    /// Ephemeral public key length does not match the header's curve
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
}

fn hex_magic(magic: &[u8; 3]) -> String {
    format!("{:02X}{:02X}{:02X}", magic[0], magic[1], magic[2])
}
