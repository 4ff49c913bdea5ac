//! Resource Locator for NanoTDF
//!
//! The Resource Locator provides a compact way to reference external
//! resources like KAS endpoints and remote policies.

use crate::binary::{BinaryParse, BinarySerialize, ByteReader};
use crate::error::ProtocolError;

/// Protocol type for resource location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Protocol {
    /// HTTP protocol
    Http = 0x0,
    /// HTTPS protocol
    Https = 0x1,
}

impl Protocol {
    /// Parse from a 4-bit value; `None` for nibbles outside the enum
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0F {
            0x0 => Some(Protocol::Http),
            0x1 => Some(Protocol::Https),
            _ => None,
        }
    }

    /// Convert to a 4-bit value
    pub fn to_bits(self) -> u8 {
        self as u8
    }

    /// URL scheme prefix, including `://`
    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http://",
            Protocol::Https => "https://",
        }
    }
}

/// Identifier type and length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierType {
    /// No identifier
    None,
    /// 2-byte identifier
    TwoByte,
    /// 8-byte identifier
    EightByte,
    /// 32-byte identifier
    ThirtyTwoByte,
}

impl IdentifierType {
    /// Parse from a 4-bit value; `None` for nibbles outside the enum
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x0F {
            0x0 => Some(IdentifierType::None),
            0x1 => Some(IdentifierType::TwoByte),
            0x2 => Some(IdentifierType::EightByte),
            0x3 => Some(IdentifierType::ThirtyTwoByte),
            _ => None,
        }
    }

    /// Convert to a 4-bit value
    pub fn to_bits(self) -> u8 {
        match self {
            IdentifierType::None => 0x0,
            IdentifierType::TwoByte => 0x1,
            IdentifierType::EightByte => 0x2,
            IdentifierType::ThirtyTwoByte => 0x3,
        }
    }

    /// Byte length of this identifier type
    pub fn byte_length(self) -> usize {
        match self {
            IdentifierType::None => 0,
            IdentifierType::TwoByte => 2,
            IdentifierType::EightByte => 8,
            IdentifierType::ThirtyTwoByte => 32,
        }
    }

    /// Identifier type for a given identifier length
    pub fn for_length(len: usize) -> Result<Self, ProtocolError> {
        match len {
            0 => Ok(IdentifierType::None),
            2 => Ok(IdentifierType::TwoByte),
            8 => Ok(IdentifierType::EightByte),
            32 => Ok(IdentifierType::ThirtyTwoByte),
            _ => Err(ProtocolError::InvalidIdentifierLength(len)),
        }
    }
}

/// Resource Locator - compact reference to external resources
///
/// Structure:
/// ```text
/// ┌────────────────┬──────────────┬────────────┬─────────────────────┐
/// │ Descriptor (1B)│ Body Len (1B)│ Body (var) │ Identifier (0-32B)  │
/// └────────────────┴──────────────┴────────────┴─────────────────────┘
/// ```
///
/// The descriptor byte contains:
/// - Bits 7-4: Protocol enum
/// - Bits 3-0: Identifier type
///
/// Immutable once constructed; the body is the URL tail after the scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    protocol: Protocol,
    body: Vec<u8>,
    identifier: Option<Vec<u8>>,
}

impl ResourceLocator {
    /// Create a new resource locator with no identifier
    pub fn new(protocol: Protocol, body: impl Into<Vec<u8>>) -> Self {
        Self {
            protocol,
            body: body.into(),
            identifier: None,
        }
    }

    /// Set the identifier.
    ///
    /// Lengths 2, 8 and 32 are stored; length 0 clears the identifier; any
    /// other length fails with [`ProtocolError::InvalidIdentifierLength`].
    pub fn with_identifier(mut self, identifier: Vec<u8>) -> Result<Self, ProtocolError> {
        match IdentifierType::for_length(identifier.len())? {
            IdentifierType::None => self.identifier = None,
            _ => self.identifier = Some(identifier),
        }
        Ok(self)
    }

    /// Create from a URL string, classifying the scheme.
    ///
    /// Only `http://` and `https://` are accepted; anything else fails with
    /// [`ProtocolError::UnsupportedProtocol`].
    pub fn from_url(url: &str) -> Result<Self, ProtocolError> {
        if let Some(rest) = url.strip_prefix("http://") {
            Ok(Self::new(Protocol::Http, rest.as_bytes()))
        } else if let Some(rest) = url.strip_prefix("https://") {
            Ok(Self::new(Protocol::Https, rest.as_bytes()))
        } else {
            Err(ProtocolError::UnsupportedProtocol(
                url.split("://").next().unwrap_or(url).to_string(),
            ))
        }
    }

    /// Reconstitute `scheme + body` as a URL string.
    ///
    /// The identifier is not part of the printable URL.
    pub fn to_url(&self) -> Result<String, ProtocolError> {
        let body = std::str::from_utf8(&self.body)
            .map_err(|_| ProtocolError::MalformedLocator("body is not valid UTF-8".to_string()))?;
        Ok(format!("{}{}", self.protocol.scheme(), body))
    }

    /// Protocol of this locator
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// URL tail after the scheme
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Identifier bytes, if any
    pub fn identifier(&self) -> Option<&[u8]> {
        self.identifier.as_deref()
    }

    /// Identifier type of this locator
    pub fn identifier_type(&self) -> IdentifierType {
        match &self.identifier {
            None => IdentifierType::None,
            Some(id) => IdentifierType::for_length(id.len()).unwrap_or(IdentifierType::None),
        }
    }
}

impl BinaryParse for ResourceLocator {
    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ProtocolError> {
        // All failures inside a locator, including exhaustion, surface as
        // MalformedLocator; TruncatedInput belongs to the enclosing stages.
        let short = |what: &str| ProtocolError::MalformedLocator(format!("truncated {what}"));

        let descriptor = reader.read_u8().map_err(|_| short("descriptor"))?;

        let protocol = Protocol::from_bits(descriptor >> 4).ok_or_else(|| {
            ProtocolError::MalformedLocator(format!(
                "unknown protocol nibble: 0x{:X}",
                descriptor >> 4
            ))
        })?;
        let identifier_type = IdentifierType::from_bits(descriptor & 0x0F).ok_or_else(|| {
            ProtocolError::MalformedLocator(format!(
                "unknown identifier type nibble: 0x{:X}",
                descriptor & 0x0F
            ))
        })?;

        let body_len = reader.read_u8().map_err(|_| short("body length"))? as usize;
        let body = reader.read_bytes(body_len).map_err(|_| short("body"))?.to_vec();

        let identifier = match identifier_type.byte_length() {
            0 => None,
            n => Some(reader.read_bytes(n).map_err(|_| short("identifier"))?.to_vec()),
        };

        Ok(Self {
            protocol,
            body,
            identifier,
        })
    }
}

impl BinarySerialize for ResourceLocator {
    fn serialized_size(&self) -> usize {
        1 + // descriptor
        1 + // body length
        self.body.len() +
        self.identifier.as_ref().map(|id| id.len()).unwrap_or(0)
    }

    fn write_into(&self, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
        if self.body.len() > 255 {
            return Err(ProtocolError::MalformedLocator(format!(
                "body too long: {} bytes (max 255)",
                self.body.len()
            )));
        }

        let descriptor = (self.protocol.to_bits() << 4) | self.identifier_type().to_bits();
        out.push(descriptor);
        out.push(self.body.len() as u8);
        out.extend_from_slice(&self.body);
        if let Some(ref id) = self.identifier {
            out.extend_from_slice(id);
        }
        Ok(())
    }
}
