//! Zeroizing cryptographic key types
//!
//! Secure wrappers for key material that clear memory on drop and compare
//! in constant time.

use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Derived symmetric key that zeroizes on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(Vec<u8>);

impl SymmetricKey {
    /// Create a key from raw bytes, taking ownership
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SymmetricKey(bytes)
    }

    /// Get a reference to the key bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SymmetricKey {}

impl fmt::Debug for SymmetricKey {
    // Key material must never reach logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey({} bytes)", self.0.len())
    }
}

/// ECDH shared secret that zeroizes on drop.
///
/// Raw agreement output; feed it through HKDF before use as a key.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        SharedSecret(Zeroizing::new(bytes))
    }

    /// Get a reference to the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Secret length in bytes (the curve's field size)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)", self.0.len())
    }
}
