//! Process-wide cryptographic context
//!
//! Per the NanoTDF spec, the HKDF salt is `SHA256(MAGIC_NUMBER + VERSION)`.
//! The context computes it once and hands it to every engine; initialization
//! is explicit and idempotent via [`CryptoContext::global`].

use lazy_static::lazy_static;
use nanotdf_protocol::MAGIC_NUMBER_AND_VERSION;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref GLOBAL_CONTEXT: CryptoContext = CryptoContext::for_magic(MAGIC_NUMBER_AND_VERSION);
}

/// Shared parameters for key derivation.
///
/// Copyable by design: engines hold their own copy, so a context built with
/// [`CryptoContext::with_salt`] needs no particular lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoContext {
    hkdf_salt: [u8; 32],
}

impl CryptoContext {
    /// The process-wide context for the standard magic/version.
    ///
    /// The first call initializes it; later calls return the same instance.
    pub fn global() -> &'static CryptoContext {
        &GLOBAL_CONTEXT
    }

    /// Context for a given magic/version prefix
    pub fn for_magic(magic: [u8; 3]) -> Self {
        Self {
            hkdf_salt: Sha256::digest(magic).into(),
        }
    }

    /// Context with an explicit HKDF salt (interop and tests)
    pub fn with_salt(salt: [u8; 32]) -> Self {
        Self { hkdf_salt: salt }
    }

    /// HKDF salt for key derivation
    pub fn hkdf_salt(&self) -> &[u8; 32] {
        &self.hkdf_salt
    }
}
