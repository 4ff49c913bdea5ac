//! NanoTDF Header Structures
//!
//! The header carries everything a recipient needs to re-derive the payload
//! key: the KAS locator, the key-agreement mode, the payload cipher config,
//! the bound policy, and the sender's ephemeral public key.

use crate::binary::{BinaryParse, BinarySerialize, ByteReader};
use crate::error::ProtocolError;
use crate::policy::PolicyInfo;
use crate::resource_locator::ResourceLocator;
use crate::{GMAC_BINDING_LEN, MAGIC_NUMBER_AND_VERSION};

/// Elliptic curve for key agreement and policy-binding signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EccCurve {
    /// secp256r1 (P-256) - NIST curve
    P256 = 0x0,
    /// secp384r1 (P-384) - NIST curve
    P384 = 0x1,
    /// secp521r1 (P-521) - NIST curve
    P521 = 0x2,
    /// secp256k1 - Koblitz curve
    Secp256k1 = 0x3,
}

impl EccCurve {
    /// Parse from a 4-bit value
    pub fn from_bits(bits: u8) -> Result<Self, ProtocolError> {
        match bits & 0x0F {
            0x0 => Ok(EccCurve::P256),
            0x1 => Ok(EccCurve::P384),
            0x2 => Ok(EccCurve::P521),
            0x3 => Ok(EccCurve::Secp256k1),
            other => Err(ProtocolError::UnsupportedCurve(other)),
        }
    }

    /// Convert to a 4-bit value
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Size of a SEC1 compressed public key for this curve:
    /// 1 prefix byte + ceil(field_bits / 8) bytes of X-coordinate
    pub fn compressed_key_len(self) -> usize {
        match self {
            EccCurve::P256 => 33,
            EccCurve::P384 => 49,
            EccCurve::P521 => 67,
            EccCurve::Secp256k1 => 33,
        }
    }

    /// Size of a fixed-width ECDSA (r,s) signature for this curve
    pub fn signature_len(self) -> usize {
        match self {
            EccCurve::P256 => 64,
            EccCurve::P384 => 96,
            EccCurve::P521 => 132,
            EccCurve::Secp256k1 => 64,
        }
    }
}

/// Key-agreement mode (1 byte bitfield)
///
/// ```text
/// ┌──────────────┬───────────┬──────────────┐
/// │Curve Enum(4b)│UNUSED(3b) │USE_ECDSA(1b) │
/// └──────────────┴───────────┴──────────────┘
/// ```
///
/// Names the curve for the ephemeral key and whether the policy binding is
/// an ECDSA signature (bit set) or a GMAC tag (bit clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAgreementMode {
    curve: EccCurve,
    use_signature_binding: bool,
}

impl KeyAgreementMode {
    /// Create a new key-agreement mode
    pub fn new(curve: EccCurve, use_signature_binding: bool) -> Self {
        Self {
            curve,
            use_signature_binding,
        }
    }

    /// Parse from byte
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        let curve = EccCurve::from_bits(byte >> 4)?;
        let use_signature_binding = (byte & 0x01) != 0;
        Ok(Self {
            curve,
            use_signature_binding,
        })
    }

    /// Convert to byte
    pub fn to_byte(self) -> u8 {
        (self.curve.to_bits() << 4) | u8::from(self.use_signature_binding)
    }

    /// Curve for the ephemeral key and (if enabled) the binding signature
    pub fn curve(&self) -> EccCurve {
        self.curve
    }

    /// Whether the policy binding is an ECDSA signature
    pub fn use_signature_binding(&self) -> bool {
        self.use_signature_binding
    }

    /// Byte length of the policy binding under this mode
    pub fn binding_len(&self) -> usize {
        if self.use_signature_binding {
            self.curve.signature_len()
        } else {
            GMAC_BINDING_LEN
        }
    }
}

/// Symmetric cipher for payload encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SymmetricCipher {
    /// AES-256-GCM with 64-bit authentication tag
    Aes256Gcm64 = 0x0,
    /// AES-256-GCM with 96-bit authentication tag
    Aes256Gcm96 = 0x1,
    /// AES-256-GCM with 104-bit authentication tag
    Aes256Gcm104 = 0x2,
    /// AES-256-GCM with 112-bit authentication tag
    Aes256Gcm112 = 0x3,
    /// AES-256-GCM with 120-bit authentication tag
    Aes256Gcm120 = 0x4,
    /// AES-256-GCM with 128-bit authentication tag
    Aes256Gcm128 = 0x5,
    /// AES-256 with HMAC-SHA-256 authentication (encrypt-then-MAC AEAD)
    HmacSha256 = 0x6,
}

impl SymmetricCipher {
    /// Parse from a 4-bit value
    pub fn from_bits(bits: u8) -> Result<Self, ProtocolError> {
        match bits & 0x0F {
            0x0 => Ok(SymmetricCipher::Aes256Gcm64),
            0x1 => Ok(SymmetricCipher::Aes256Gcm96),
            0x2 => Ok(SymmetricCipher::Aes256Gcm104),
            0x3 => Ok(SymmetricCipher::Aes256Gcm112),
            0x4 => Ok(SymmetricCipher::Aes256Gcm120),
            0x5 => Ok(SymmetricCipher::Aes256Gcm128),
            0x6 => Ok(SymmetricCipher::HmacSha256),
            other => Err(ProtocolError::UnsupportedCipher(other)),
        }
    }

    /// Convert to a 4-bit value
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// Size of the authentication tag in bytes
    pub fn tag_len(self) -> usize {
        match self {
            SymmetricCipher::Aes256Gcm64 => 8,
            SymmetricCipher::Aes256Gcm96 => 12,
            SymmetricCipher::Aes256Gcm104 => 13,
            SymmetricCipher::Aes256Gcm112 => 14,
            SymmetricCipher::Aes256Gcm120 => 15,
            SymmetricCipher::Aes256Gcm128 => 16,
            SymmetricCipher::HmacSha256 => 32,
        }
    }
}

/// Payload configuration (1 byte bitfield)
///
/// ```text
/// ┌─────────────────────┬────────────────────┐
/// │Symmetric Cipher(4b) │Payload Size Class(4b)│
/// └─────────────────────┴────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadConfig {
    cipher: SymmetricCipher,
    size_class: u8,
}

impl PayloadConfig {
    /// Create a new payload config; only the low nibble of `size_class`
    /// is representable
    pub fn new(cipher: SymmetricCipher, size_class: u8) -> Self {
        Self {
            cipher,
            size_class: size_class & 0x0F,
        }
    }

    /// Parse from byte
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        let cipher = SymmetricCipher::from_bits(byte >> 4)?;
        Ok(Self {
            cipher,
            size_class: byte & 0x0F,
        })
    }

    /// Convert to byte
    pub fn to_byte(self) -> u8 {
        (self.cipher.to_bits() << 4) | self.size_class
    }

    /// Symmetric cipher for the payload
    pub fn cipher(&self) -> SymmetricCipher {
        self.cipher
    }

    /// Payload size class (0-15)
    pub fn size_class(&self) -> u8 {
        self.size_class
    }
}

/// NanoTDF Header
///
/// Contains all metadata needed to re-derive the payload key:
/// - KAS location
/// - Key-agreement mode and payload cipher config
/// - Policy with its binding
/// - Ephemeral public key (SEC1 compressed)
///
/// Immutable after construction. The 3-byte magic/version prefix is implicit
/// on the wire: checked on parse, emitted on serialize, never stored. For
/// collection-key caching two headers are interchangeable exactly when their
/// serialized bytes are identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    kas: ResourceLocator,
    mode: KeyAgreementMode,
    payload_config: PayloadConfig,
    policy: PolicyInfo,
    ephemeral_public_key: Vec<u8>,
}

impl Header {
    /// Create a new header.
    ///
    /// The ephemeral public key must be exactly the curve's compressed-point
    /// length and the policy binding must be present.
    pub fn new(
        kas: ResourceLocator,
        mode: KeyAgreementMode,
        payload_config: PayloadConfig,
        policy: PolicyInfo,
        ephemeral_public_key: Vec<u8>,
    ) -> Result<Self, ProtocolError> {
        let expected = mode.curve().compressed_key_len();
        if ephemeral_public_key.len() != expected {
            return Err(ProtocolError::InvalidKeyLength {
                expected,
                got: ephemeral_public_key.len(),
            });
        }
        if policy.binding().is_empty() {
            return Err(ProtocolError::MissingBinding);
        }

        Ok(Self {
            kas,
            mode,
            payload_config,
            policy,
            ephemeral_public_key,
        })
    }

    /// KAS resource locator
    pub fn kas(&self) -> &ResourceLocator {
        &self.kas
    }

    /// Key-agreement mode
    pub fn mode(&self) -> KeyAgreementMode {
        self.mode
    }

    /// Payload cipher configuration
    pub fn payload_config(&self) -> PayloadConfig {
        self.payload_config
    }

    /// Policy with its binding
    pub fn policy(&self) -> &PolicyInfo {
        &self.policy
    }

    /// Ephemeral public key (SEC1 compressed point)
    pub fn ephemeral_public_key(&self) -> &[u8] {
        &self.ephemeral_public_key
    }
}

impl BinaryParse for Header {
    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ProtocolError> {
        let magic: [u8; 3] = reader.read_array()?;
        if magic != MAGIC_NUMBER_AND_VERSION {
            return Err(ProtocolError::BadMagicNumber(magic));
        }

        let kas = ResourceLocator::read_from(reader)?;
        let mode = KeyAgreementMode::from_byte(reader.read_u8()?)?;
        let payload_config = PayloadConfig::from_byte(reader.read_u8()?)?;
        let policy = PolicyInfo::read_from(reader, &mode)?;
        let ephemeral_public_key = reader
            .read_bytes(mode.curve().compressed_key_len())?
            .to_vec();

        Ok(Self {
            kas,
            mode,
            payload_config,
            policy,
            ephemeral_public_key,
        })
    }
}

impl BinarySerialize for Header {
    fn serialized_size(&self) -> usize {
        3 + self.kas.serialized_size()
            + 1
            + 1
            + self.policy.serialized_size()
            + self.ephemeral_public_key.len()
    }

    fn write_into(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
        out.extend_from_slice(&MAGIC_NUMBER_AND_VERSION);
        self.kas.write_into(out)?;
        out.push(self.mode.to_byte());
        out.push(self.payload_config.to_byte());
        self.policy.write_into(out)?;
        out.extend_from_slice(&self.ephemeral_public_key);
        Ok(())
    }
}
