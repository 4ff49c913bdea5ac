//! NanoTDF Cryptographic Operations
//!
//! This crate provides the key-agreement machinery behind the NanoTDF
//! envelope format:
//! - EC key pairs on the four header curves (P-256, P-384, P-521, secp256k1)
//! - ECDH key agreement and HKDF-SHA256 key derivation
//! - ECDSA and GMAC policy bindings
//! - A bounded cache that lets many envelopes sharing one header reuse a
//!   derived key
//!
//! # Security Features
//!
//! - **Zeroization**: symmetric keys and shared secrets clear their memory
//!   on drop; EC private scalars zeroize inside `elliptic_curve::SecretKey`
//! - **Constant-time comparison**: binding tags and keys compare via
//!   `subtle::ConstantTimeEq`
//! - Private key material is never logged, serialized, or cached

pub mod agreement;
pub mod binding;
pub mod cache;
pub mod collection;
pub mod context;
pub mod error;
pub mod keys;
pub mod types;

pub use agreement::KeyAgreementEngine;
pub use binding::{
    ecdsa_policy_binding, gmac_policy_binding, verify_ecdsa_policy_binding,
    verify_gmac_policy_binding,
};
pub use cache::{CollectionKey, CollectionKeyCache, MAX_CACHED_COLLECTIONS};
pub use collection::{open_collection_header, CollectionBuilder, SealedCollection};
pub use context::CryptoContext;
pub use error::CryptoError;
pub use keys::{EcPrivateKey, EcPublicKey};
pub use types::{SharedSecret, SymmetricKey};

// Re-export the underlying curve crates for callers that need raw key types
pub use k256;
pub use p256;
pub use p384;
pub use p521;

/// Byte length of a derived collection key (AES-256)
pub const COLLECTION_KEY_LEN: usize = 32;
