//! NanoTDF Protocol Types
//!
//! This crate implements the NanoTDF compact binary envelope format:
//! the header, resource locators, policy structures, and the single-byte
//! mode/config descriptors they are built from.
//!
//! This crate contains NO cryptographic operations and NO I/O.
//! It is purely focused on wire structures and their serialization.
//!
//! ## Format Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │ Magic (3B) │ KAS Locator │ Mode (1B) │ Config (1B) │ Policy │ Key  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - Magic number: `L1L` (base64) = `0x4C314C` (hex)
//! - All multi-byte integers are big-endian

pub mod binary;
pub mod error;
pub mod header;
pub mod policy;
pub mod resource_locator;

pub use binary::{BinaryParse, BinarySerialize, ByteReader};
pub use error::ProtocolError;
pub use header::{EccCurve, Header, KeyAgreementMode, PayloadConfig, SymmetricCipher};
pub use policy::{PolicyBody, PolicyInfo, PolicyType};
pub use resource_locator::{IdentifierType, Protocol, ResourceLocator};

/// Magic number (18 bits) + version (6 bits) = "L1L" when base64 encoded.
///
/// The magic is implicit on the wire: verified during parsing, emitted
/// during serialization, never stored in a [`Header`].
pub const MAGIC_NUMBER_AND_VERSION: [u8; 3] = [0x4C, 0x31, 0x4C];

/// Byte length of the GMAC policy-binding slot.
pub const GMAC_BINDING_LEN: usize = 8;
