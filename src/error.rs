//! Unified error type for the NanoTDF public API
//!
//! Internal crates keep their domain-specific errors for precise handling;
//! this type consolidates them for SDK consumers.

use thiserror::Error;

/// Unified error type for all NanoTDF operations
///
/// # Error Categories
///
/// - **Protocol**: wire-format violations (truncation, bad magic, unknown
///   nibbles, variant misuse)
/// - **Crypto**: key agreement, key encoding, and binding verification
///   failures
#[derive(Debug, Error)]
pub enum NanoTdfError {
    /// Wire-format error
    #[error("Protocol error: {0}")]
    Protocol(#[from] nanotdf_protocol::ProtocolError),

    /// Cryptographic operation error
    #[error("Crypto error: {0}")]
    Crypto(#[from] nanotdf_crypto::CryptoError),
}

impl NanoTdfError {
    /// Returns true if this is a wire-format error
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns true if this is a cryptographic error
    pub fn is_crypto_error(&self) -> bool {
        matches!(self, Self::Crypto(_))
    }
}
