//! Policy binding computation and verification
//!
//! The binding proves the policy carried in a header was produced by a party
//! holding the derived collection key (GMAC) or the ephemeral private key
//! (ECDSA). GMAC here is AES-256-GCM over an empty message with the policy
//! bytes as AAD, using the reserved all-zero policy IV; the wire slot holds
//! the leftmost 8 bytes of the tag (the standard short-tag construction).

use crate::agreement::KeyAgreementEngine;
use crate::error::CryptoError;
use crate::keys::EcPublicKey;
use crate::types::SymmetricKey;
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use nanotdf_protocol::GMAC_BINDING_LEN;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Reserved IV for policy binding; never used for payload segments
const POLICY_NONCE: [u8; 12] = [0u8; 12];

/// Compute the 8-byte GMAC policy binding over `policy_bytes`
pub fn gmac_policy_binding(
    key: &SymmetricKey,
    policy_bytes: &[u8],
) -> Result<[u8; GMAC_BINDING_LEN], CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_slice()).map_err(|_| {
        CryptoError::InvalidKeyLength {
            expected: 32,
            got: key.len(),
        }
    })?;

    // GMAC: encrypt an empty message, authenticating the policy as AAD.
    // The output is just the 16-byte tag.
    let tag = cipher
        .encrypt(
            Nonce::from_slice(&POLICY_NONCE),
            Payload {
                msg: &[],
                aad: policy_bytes,
            },
        )
        .map_err(|_| CryptoError::SigningFailed("GMAC computation failed".to_string()))?;

    let mut binding = [0u8; GMAC_BINDING_LEN];
    binding.copy_from_slice(&tag[..GMAC_BINDING_LEN]);
    Ok(binding)
}

/// Verify an 8-byte GMAC policy binding in constant time
pub fn verify_gmac_policy_binding(
    key: &SymmetricKey,
    policy_bytes: &[u8],
    binding: &[u8],
) -> Result<(), CryptoError> {
    let computed = gmac_policy_binding(key, policy_bytes)?;
    if bool::from(computed.as_slice().ct_eq(binding)) {
        Ok(())
    } else {
        Err(CryptoError::SignatureVerificationFailed)
    }
}

/// Compute an ECDSA policy binding: sign SHA-256 of the policy bytes with
/// the engine's (ephemeral) private key. Fixed-width (r,s), sized per the
/// engine's curve.
pub fn ecdsa_policy_binding(
    engine: &KeyAgreementEngine,
    policy_bytes: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let digest = Sha256::digest(policy_bytes);
    engine.sign(digest.as_slice())
}

/// Verify an ECDSA policy binding against the envelope's ephemeral public key
pub fn verify_ecdsa_policy_binding(
    public_key: &EcPublicKey,
    policy_bytes: &[u8],
    binding: &[u8],
) -> Result<(), CryptoError> {
    let digest = Sha256::digest(policy_bytes);
    if KeyAgreementEngine::verify(digest.as_slice(), binding, public_key) {
        Ok(())
    } else {
        Err(CryptoError::SignatureVerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CryptoContext;
    use nanotdf_protocol::EccCurve;

    fn test_key() -> SymmetricKey {
        SymmetricKey::from_bytes(vec![0x42; 32])
    }

    #[test]
    fn test_gmac_binding_deterministic() {
        let key = test_key();
        let policy = br#"{"uuid":"abc"}"#;

        let a = gmac_policy_binding(&key, policy).unwrap();
        let b = gmac_policy_binding(&key, policy).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), GMAC_BINDING_LEN);
    }

    #[test]
    fn test_gmac_binding_verify() {
        let key = test_key();
        let policy = b"policy data to authenticate";

        let binding = gmac_policy_binding(&key, policy).unwrap();
        assert!(verify_gmac_policy_binding(&key, policy, &binding).is_ok());

        // Tampered policy fails
        assert!(matches!(
            verify_gmac_policy_binding(&key, b"tampered policy", &binding),
            Err(CryptoError::SignatureVerificationFailed)
        ));

        // Wrong key fails
        let other_key = SymmetricKey::from_bytes(vec![0x43; 32]);
        assert!(matches!(
            verify_gmac_policy_binding(&other_key, policy, &binding),
            Err(CryptoError::SignatureVerificationFailed)
        ));

        // Wrong-length binding fails rather than panicking
        assert!(matches!(
            verify_gmac_policy_binding(&key, policy, &binding[..4]),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_gmac_key_length_checked() {
        let short_key = SymmetricKey::from_bytes(vec![0x42; 16]);
        assert!(matches!(
            gmac_policy_binding(&short_key, b"policy"),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                got: 16
            })
        ));
    }

    #[test]
    fn test_ecdsa_binding_roundtrip() {
        let engine = KeyAgreementEngine::generate(EccCurve::P256, CryptoContext::global());
        let policy = br#"{"uuid":"abc"}"#;

        let binding = ecdsa_policy_binding(&engine, policy).unwrap();
        assert_eq!(binding.len(), EccCurve::P256.signature_len());
        assert!(verify_ecdsa_policy_binding(engine.public_key(), policy, &binding).is_ok());

        assert!(matches!(
            verify_ecdsa_policy_binding(engine.public_key(), b"tampered", &binding),
            Err(CryptoError::SignatureVerificationFailed)
        ));

        let other = KeyAgreementEngine::generate(EccCurve::P256, CryptoContext::global());
        assert!(matches!(
            verify_ecdsa_policy_binding(other.public_key(), policy, &binding),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }
}
