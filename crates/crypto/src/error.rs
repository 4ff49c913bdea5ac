//! Cryptographic operation errors

use thiserror::Error;

/// Errors from key agreement, binding and collection operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// ECDH failed: curve mismatch between the two keys, or an invalid point
    #[error("key agreement failed: {0}")]
    KeyAgreementFailed(String),

    /// Key material could not be decoded (PEM/PKCS#8/SEC1 parse error)
    #[error("malformed key encoding: {0}")]
    MalformedKeyEncoding(String),

    /// A policy binding or signature did not verify
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// ECDSA signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Key material has the wrong length for the operation
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// Collection builder was not given a KAS URL
    #[error("KAS URL not configured")]
    MissingKasUrl,

    /// Collection builder was not given a policy
    #[error("policy not configured")]
    MissingPolicy,

    /// Wire-format error from the protocol layer
    #[error("protocol error: {0}")]
    Protocol(#[from] nanotdf_protocol::ProtocolError),
}
