//! NanoTDF Policy Structures

use crate::binary::{write_u32_be, BinaryParse, BinarySerialize, ByteReader};
use crate::error::ProtocolError;
use crate::header::KeyAgreementMode;
use crate::resource_locator::ResourceLocator;

/// Policy type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PolicyType {
    /// Remote policy (referenced via Resource Locator)
    Remote = 0x00,
    /// Embedded policy (plaintext)
    EmbeddedPlaintext = 0x01,
    /// Embedded policy (encrypted)
    EmbeddedEncrypted = 0x02,
    /// Embedded policy (encrypted with separate key access).
    /// Recognized on the wire but deliberately unimplemented: any attempt to
    /// parse or serialize it fails with `UnsupportedPolicyVariant`.
    EmbeddedEncryptedPolicyKeyAccess = 0x03,
}

impl PolicyType {
    /// Parse from byte
    pub fn from_byte(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0x00 => Ok(PolicyType::Remote),
            0x01 => Ok(PolicyType::EmbeddedPlaintext),
            0x02 => Ok(PolicyType::EmbeddedEncrypted),
            0x03 => Ok(PolicyType::EmbeddedEncryptedPolicyKeyAccess),
            other => Err(ProtocolError::UnsupportedPolicyVariant(other)),
        }
    }

    /// Convert to byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Policy body variants.
///
/// The embedded-encrypted-with-key-access variant is not representable:
/// it is rejected at the parse boundary instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyBody {
    /// Remote policy reference
    Remote(ResourceLocator),
    /// Embedded plaintext policy
    EmbeddedPlaintext(Vec<u8>),
    /// Embedded encrypted policy
    EmbeddedEncrypted(Vec<u8>),
}

impl PolicyBody {
    /// Get the policy type
    pub fn policy_type(&self) -> PolicyType {
        match self {
            PolicyBody::Remote(_) => PolicyType::Remote,
            PolicyBody::EmbeddedPlaintext(_) => PolicyType::EmbeddedPlaintext,
            PolicyBody::EmbeddedEncrypted(_) => PolicyType::EmbeddedEncrypted,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            PolicyBody::Remote(_) => "remote",
            PolicyBody::EmbeddedPlaintext(_) => "embedded plaintext",
            PolicyBody::EmbeddedEncrypted(_) => "embedded encrypted",
        }
    }
}

/// Policy with cryptographic binding
///
/// The policy is either referenced remotely or embedded (plaintext or
/// encrypted). The binding authenticates the policy body: an 8-byte GMAC
/// tag, or a curve-sized ECDSA signature when the header's mode enables
/// signature binding. Built fresh per envelope at encrypt time; parsed
/// read-only at decrypt time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyInfo {
    body: PolicyBody,
    binding: Vec<u8>,
}

impl PolicyInfo {
    /// Create a new policy
    pub fn new(body: PolicyBody, binding: Vec<u8>) -> Self {
        Self { body, binding }
    }

    /// Create a remote policy
    pub fn remote(locator: ResourceLocator, binding: Vec<u8>) -> Self {
        Self::new(PolicyBody::Remote(locator), binding)
    }

    /// Create an embedded plaintext policy
    pub fn embedded_plaintext(content: Vec<u8>, binding: Vec<u8>) -> Self {
        Self::new(PolicyBody::EmbeddedPlaintext(content), binding)
    }

    /// Create an embedded encrypted policy
    pub fn embedded_encrypted(content: Vec<u8>, binding: Vec<u8>) -> Self {
        Self::new(PolicyBody::EmbeddedEncrypted(content), binding)
    }

    /// Get the policy type
    pub fn policy_type(&self) -> PolicyType {
        self.body.policy_type()
    }

    /// Policy body
    pub fn body(&self) -> &PolicyBody {
        &self.body
    }

    /// Binding bytes (GMAC tag or ECDSA signature)
    pub fn binding(&self) -> &[u8] {
        &self.binding
    }

    /// Remote policy locator; fails unless this is a remote policy
    pub fn remote_locator(&self) -> Result<&ResourceLocator, ProtocolError> {
        match &self.body {
            PolicyBody::Remote(locator) => Ok(locator),
            other => Err(ProtocolError::WrongPolicyVariant {
                expected: "remote",
                actual: other.variant_name(),
            }),
        }
    }

    /// Remote policy URL; fails unless this is a remote policy
    pub fn remote_url(&self) -> Result<String, ProtocolError> {
        self.remote_locator()?.to_url()
    }

    /// Plaintext policy content; fails unless this is an embedded plaintext
    /// policy
    pub fn plaintext_body(&self) -> Result<&[u8], ProtocolError> {
        match &self.body {
            PolicyBody::EmbeddedPlaintext(content) => Ok(content),
            other => Err(ProtocolError::WrongPolicyVariant {
                expected: "embedded plaintext",
                actual: other.variant_name(),
            }),
        }
    }

    /// Encrypted policy content; fails unless this is an embedded encrypted
    /// policy
    pub fn encrypted_body(&self) -> Result<&[u8], ProtocolError> {
        match &self.body {
            PolicyBody::EmbeddedEncrypted(content) => Ok(content),
            other => Err(ProtocolError::WrongPolicyVariant {
                expected: "embedded encrypted",
                actual: other.variant_name(),
            }),
        }
    }

    /// Decode a policy. The binding length is fixed by the enclosing
    /// header's key-agreement mode, so parsing needs it as context.
    pub fn read_from(
        reader: &mut ByteReader<'_>,
        mode: &KeyAgreementMode,
    ) -> Result<Self, ProtocolError> {
        let policy_type = PolicyType::from_byte(reader.read_u8()?)?;

        let body = match policy_type {
            PolicyType::Remote => {
                let locator = ResourceLocator::read_from(reader)?;
                PolicyBody::Remote(locator)
            }
            PolicyType::EmbeddedPlaintext | PolicyType::EmbeddedEncrypted => {
                let content_len = reader.read_u32_be()? as usize;
                let content = reader.read_bytes(content_len)?.to_vec();
                if policy_type == PolicyType::EmbeddedPlaintext {
                    PolicyBody::EmbeddedPlaintext(content)
                } else {
                    PolicyBody::EmbeddedEncrypted(content)
                }
            }
            PolicyType::EmbeddedEncryptedPolicyKeyAccess => {
                return Err(ProtocolError::UnsupportedPolicyVariant(
                    policy_type.to_byte(),
                ));
            }
        };

        let binding = reader.read_bytes(mode.binding_len())?.to_vec();

        Ok(Self { body, binding })
    }
}

impl BinarySerialize for PolicyInfo {
    fn serialized_size(&self) -> usize {
        let body_size = match &self.body {
            PolicyBody::Remote(locator) => locator.serialized_size(),
            PolicyBody::EmbeddedPlaintext(content) | PolicyBody::EmbeddedEncrypted(content) => {
                4 + content.len()
            }
        };
        1 + body_size + self.binding.len()
    }

    fn write_into(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
        if self.binding.is_empty() {
            return Err(ProtocolError::MissingBinding);
        }

        out.push(self.policy_type().to_byte());

        match &self.body {
            PolicyBody::Remote(locator) => {
                locator.write_into(out)?;
            }
            PolicyBody::EmbeddedPlaintext(content) | PolicyBody::EmbeddedEncrypted(content) => {
                write_u32_be(out, content.len() as u32);
                out.extend_from_slice(content);
            }
        }

        out.extend_from_slice(&self.binding);
        Ok(())
    }
}
