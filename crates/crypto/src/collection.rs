//! Collection construction and opening
//!
//! A collection is a set of envelopes sharing one header and therefore one
//! derived key. The builder performs the expensive ECDH + HKDF round once
//! and produces the header alongside the key; the opener re-derives the key
//! from a received header, consulting a [`CollectionKeyCache`] first so
//! repeated headers skip the asymmetric work.

use crate::agreement::KeyAgreementEngine;
use crate::binding::{
    ecdsa_policy_binding, gmac_policy_binding, verify_ecdsa_policy_binding,
    verify_gmac_policy_binding,
};
use crate::cache::{CollectionKey, CollectionKeyCache};
use crate::context::CryptoContext;
use crate::error::CryptoError;
use crate::keys::EcPublicKey;
use crate::types::SymmetricKey;
use nanotdf_protocol::{
    BinaryParse, BinarySerialize, EccCurve, Header, KeyAgreementMode, PayloadConfig, PolicyBody,
    PolicyInfo, ResourceLocator, SymmetricCipher,
};

/// A freshly built collection header and its derived key
pub struct SealedCollection {
    header: Header,
    key: SymmetricKey,
}

impl SealedCollection {
    /// The header shared by every envelope in the collection
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The derived symmetric key
    pub fn key(&self) -> &SymmetricKey {
        &self.key
    }

    /// Split into header and key
    pub fn into_parts(self) -> (Header, SymmetricKey) {
        (self.header, self.key)
    }
}

/// Builder for collection headers
///
/// Defaults: P-256, GMAC binding, AES-256-GCM-96, payload size class 0.
#[derive(Clone)]
pub struct CollectionBuilder {
    kas_url: Option<String>,
    kas_identifier: Option<Vec<u8>>,
    policy_body: Option<PolicyBody>,
    curve: EccCurve,
    use_signature_binding: bool,
    cipher: SymmetricCipher,
    payload_size_class: u8,
}

impl CollectionBuilder {
    /// Create a builder with defaults
    pub fn new() -> Self {
        Self {
            kas_url: None,
            kas_identifier: None,
            policy_body: None,
            curve: EccCurve::P256,
            use_signature_binding: false,
            cipher: SymmetricCipher::Aes256Gcm96,
            payload_size_class: 0,
        }
    }

    /// Set the KAS URL
    #[must_use]
    pub fn kas_url(mut self, url: impl Into<String>) -> Self {
        self.kas_url = Some(url.into());
        self
    }

    /// Set the KAS key identifier (2, 8 or 32 bytes)
    #[must_use]
    pub fn kas_identifier(mut self, identifier: &[u8]) -> Self {
        self.kas_identifier = Some(identifier.to_vec());
        self
    }

    /// Set a remote policy reference
    #[must_use]
    pub fn policy_remote(mut self, locator: ResourceLocator) -> Self {
        self.policy_body = Some(PolicyBody::Remote(locator));
        self
    }

    /// Set an embedded plaintext policy
    #[must_use]
    pub fn policy_plaintext(mut self, body: Vec<u8>) -> Self {
        self.policy_body = Some(PolicyBody::EmbeddedPlaintext(body));
        self
    }

    /// Set an embedded encrypted policy (already-encrypted bytes)
    #[must_use]
    pub fn policy_encrypted(mut self, body: Vec<u8>) -> Self {
        self.policy_body = Some(PolicyBody::EmbeddedEncrypted(body));
        self
    }

    /// Set the ECC curve (default: P-256)
    #[must_use]
    pub fn curve(mut self, curve: EccCurve) -> Self {
        self.curve = curve;
        self
    }

    /// Bind the policy with an ECDSA signature instead of GMAC
    #[must_use]
    pub fn signature_binding(mut self, enabled: bool) -> Self {
        self.use_signature_binding = enabled;
        self
    }

    /// Set the symmetric cipher (default: AES-256-GCM-96)
    #[must_use]
    pub fn cipher(mut self, cipher: SymmetricCipher) -> Self {
        self.cipher = cipher;
        self
    }

    /// Set the payload size class nibble (default: 0)
    #[must_use]
    pub fn payload_size_class(mut self, size_class: u8) -> Self {
        self.payload_size_class = size_class;
        self
    }

    /// Build the header by performing key agreement with the recipient.
    ///
    /// This runs the expensive ECDH + HKDF round once; every envelope in the
    /// collection reuses the returned key.
    pub fn build(
        self,
        recipient_public_key: &EcPublicKey,
        context: &CryptoContext,
    ) -> Result<SealedCollection, CryptoError> {
        let kas_url = self.kas_url.ok_or(CryptoError::MissingKasUrl)?;
        let policy_body = self.policy_body.ok_or(CryptoError::MissingPolicy)?;

        let engine = KeyAgreementEngine::generate(self.curve, context);
        let shared = engine.agree(recipient_public_key)?;
        let key = engine.derive_collection_key(&shared)?;

        let policy_bytes = policy_binding_input(&policy_body)?;
        let binding = if self.use_signature_binding {
            ecdsa_policy_binding(&engine, &policy_bytes)?
        } else {
            gmac_policy_binding(&key, &policy_bytes)?.to_vec()
        };

        let mut kas = ResourceLocator::from_url(&kas_url)?;
        if let Some(identifier) = self.kas_identifier {
            kas = kas.with_identifier(identifier)?;
        }

        let header = Header::new(
            kas,
            KeyAgreementMode::new(self.curve, self.use_signature_binding),
            PayloadConfig::new(self.cipher, self.payload_size_class),
            PolicyInfo::new(policy_body, binding),
            engine.compressed_public_key(),
        )?;

        Ok(SealedCollection { header, key })
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-derive the collection key for a received header.
///
/// The cache is probed before any asymmetric work; on a miss the key is
/// derived via ECDH with the KAS engine, the policy binding is verified,
/// and the result is stored for the next envelope sharing this header.
pub fn open_collection_header(
    header_bytes: &[u8],
    kas_engine: &KeyAgreementEngine,
    cache: &CollectionKeyCache,
) -> Result<(Header, SymmetricKey), CryptoError> {
    let header = Header::parse(header_bytes)?;

    if let CollectionKey::Key(key) = cache.get_key(&header) {
        return Ok((header, key));
    }

    let mode = header.mode();
    let ephemeral = EcPublicKey::from_compressed(mode.curve(), header.ephemeral_public_key())?;
    let shared = kas_engine.agree(&ephemeral)?;
    let key = kas_engine.derive_collection_key(&shared)?;

    let policy_bytes = policy_binding_input(header.policy().body())?;
    if mode.use_signature_binding() {
        verify_ecdsa_policy_binding(&ephemeral, &policy_bytes, header.policy().binding())?;
    } else {
        verify_gmac_policy_binding(&key, &policy_bytes, header.policy().binding())?;
    }

    cache.store(&header, key.clone());
    Ok((header, key))
}

/// The byte string a policy binding authenticates: the locator encoding for
/// remote policies, the content for embedded ones
fn policy_binding_input(body: &PolicyBody) -> Result<Vec<u8>, CryptoError> {
    Ok(match body {
        PolicyBody::Remote(locator) => locator.to_bytes()?,
        PolicyBody::EmbeddedPlaintext(content) | PolicyBody::EmbeddedEncrypted(content) => {
            content.clone()
        }
    })
}
