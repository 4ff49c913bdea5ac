//! NanoTDF Prelude
//!
//! A convenient single import for the types and traits most callers need.
//!
//! # Example
//!
//! ```rust
//! use nanotdf::prelude::*;
//!
//! let locator = ResourceLocator::from_url("https://kas.example.com/kas").unwrap();
//! assert_eq!(locator.protocol(), Protocol::Https);
//! ```

pub use crate::NanoTdfError;

// Wire structures and the serialization traits their methods live on
pub use nanotdf_protocol::{
    BinaryParse, BinarySerialize, EccCurve, Header, KeyAgreementMode, PayloadConfig, PolicyBody,
    PolicyInfo, PolicyType, Protocol, ResourceLocator, SymmetricCipher,
};

// Key agreement and collection machinery
pub use nanotdf_crypto::{
    open_collection_header, CollectionBuilder, CollectionKey, CollectionKeyCache, CryptoContext,
    EcPrivateKey, EcPublicKey, KeyAgreementEngine, SealedCollection, SymmetricKey,
};
