//! NanoTDF - compact secure-envelope format
//!
//! NanoTDF binds an encrypted (or remotely-referenced) access policy to a
//! symmetric content key derived via elliptic-curve key agreement, and
//! cryptographically certifies the policy's integrity. It is designed for
//! IoT, embedded systems, and bandwidth-constrained environments: minimum
//! envelope overhead is under 200 bytes.
//!
//! This crate is the SDK surface over two focused member crates:
//! - [`nanotdf_protocol`]: the binary wire structures (header, resource
//!   locators, policy) with no crypto and no I/O
//! - [`nanotdf_crypto`]: EC key agreement, key derivation, policy bindings,
//!   and the bounded collection-key cache
//!
//! # Example
//!
//! ```no_run
//! use nanotdf::prelude::*;
//!
//! # fn example() -> Result<(), nanotdf::NanoTdfError> {
//! // KAS side: a long-lived key pair
//! let kas = KeyAgreementEngine::generate(EccCurve::P256, CryptoContext::global());
//!
//! // Sender: one ECDH + HKDF round yields a header and key shared by
//! // every envelope in the collection
//! let sealed = CollectionBuilder::new()
//!     .kas_url("https://kas.example.com/kas")
//!     .policy_plaintext(br#"{"uuid":"abc"}"#.to_vec())
//!     .build(kas.public_key(), CryptoContext::global())?;
//! let header_bytes = sealed.header().to_bytes()?;
//!
//! // Receiver: re-derive the key, with a cache so repeated headers skip
//! // the asymmetric work
//! let cache = CollectionKeyCache::new();
//! let (_header, _key) = open_collection_header(&header_bytes, &kas, &cache)?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod prelude;

pub use error::NanoTdfError;

// Protocol layer
pub use nanotdf_protocol::{
    BinaryParse, BinarySerialize, ByteReader, EccCurve, Header, IdentifierType, KeyAgreementMode,
    PayloadConfig, PolicyBody, PolicyInfo, PolicyType, Protocol, ProtocolError, ResourceLocator,
    SymmetricCipher, GMAC_BINDING_LEN, MAGIC_NUMBER_AND_VERSION,
};

// Crypto layer
pub use nanotdf_crypto::{
    ecdsa_policy_binding, gmac_policy_binding, open_collection_header, verify_ecdsa_policy_binding,
    verify_gmac_policy_binding, CollectionBuilder, CollectionKey, CollectionKeyCache, CryptoContext,
    CryptoError, EcPrivateKey, EcPublicKey, KeyAgreementEngine, SealedCollection, SharedSecret,
    SymmetricKey, COLLECTION_KEY_LEN, MAX_CACHED_COLLECTIONS,
};
