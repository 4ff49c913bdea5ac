//! Key agreement engine
//!
//! Owns one EC key pair and performs the asymmetric operations an envelope
//! needs: ECDH against a counterpart public key, HKDF-SHA256 key derivation,
//! and ECDSA over a caller-supplied digest for signature policy bindings.

use crate::context::CryptoContext;
use crate::error::CryptoError;
use crate::keys::{EcPrivateKey, EcPublicKey};
use crate::types::{SharedSecret, SymmetricKey};
use crate::COLLECTION_KEY_LEN;
use hkdf::Hkdf;
use nanotdf_protocol::EccCurve;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::elliptic_curve::ecdh::diffie_hellman;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::Sha256;

/// EC key pair plus the derivation parameters it operates under.
///
/// Instances are not shared mutable state: all operations take `&self` and
/// are safe to run from many threads on independently-owned engines.
pub struct KeyAgreementEngine {
    context: CryptoContext,
    private_key: EcPrivateKey,
    public_key: EcPublicKey,
}

impl KeyAgreementEngine {
    /// Generate a fresh ephemeral key pair on the named curve
    pub fn generate(curve: EccCurve, context: &CryptoContext) -> Self {
        let private_key = EcPrivateKey::generate(curve);
        Self::from_private_key(private_key, context)
    }

    /// Wrap an existing private key
    pub fn from_private_key(private_key: EcPrivateKey, context: &CryptoContext) -> Self {
        let public_key = private_key.public_key();
        Self {
            context: *context,
            private_key,
            public_key,
        }
    }

    /// Import a PEM-encoded PKCS#8 private key
    pub fn from_private_key_pem(pem: &str, context: &CryptoContext) -> Result<Self, CryptoError> {
        Ok(Self::from_private_key(
            EcPrivateKey::from_pkcs8_pem(pem)?,
            context,
        ))
    }

    /// Curve of the engine's key pair
    pub fn curve(&self) -> EccCurve {
        self.private_key.curve()
    }

    /// Public half of the key pair
    pub fn public_key(&self) -> &EcPublicKey {
        &self.public_key
    }

    /// Public half as a SEC1 compressed point, sized per the curve
    pub fn compressed_public_key(&self) -> Vec<u8> {
        self.public_key.to_compressed()
    }

    /// Compute the ECDH shared secret with a counterpart public key.
    ///
    /// Both keys must be on the same curve. The result is the raw
    /// X-coordinate of the shared point; run it through
    /// [`derive_key`](Self::derive_key) before using it as key material.
    pub fn agree(&self, remote: &EcPublicKey) -> Result<SharedSecret, CryptoError> {
        match (&self.private_key, remote) {
            (EcPrivateKey::P256(sk), EcPublicKey::P256(pk)) => {
                let shared = diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
                Ok(SharedSecret::new(shared.raw_secret_bytes().to_vec()))
            }
            (EcPrivateKey::P384(sk), EcPublicKey::P384(pk)) => {
                let shared = diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
                Ok(SharedSecret::new(shared.raw_secret_bytes().to_vec()))
            }
            (EcPrivateKey::P521(sk), EcPublicKey::P521(pk)) => {
                let shared = diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
                Ok(SharedSecret::new(shared.raw_secret_bytes().to_vec()))
            }
            (EcPrivateKey::Secp256k1(sk), EcPublicKey::Secp256k1(pk)) => {
                let shared = diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
                Ok(SharedSecret::new(shared.raw_secret_bytes().to_vec()))
            }
            _ => Err(CryptoError::KeyAgreementFailed(format!(
                "curve mismatch: local {:?}, remote {:?}",
                self.curve(),
                remote.curve()
            ))),
        }
    }

    /// Derive `output_len` bytes of key material via HKDF-SHA256
    /// (extract-and-expand). Deterministic for identical inputs.
    pub fn derive_key(
        &self,
        salt: &[u8],
        shared_secret: &[u8],
        output_len: usize,
    ) -> Result<SymmetricKey, CryptoError> {
        let hkdf = Hkdf::<Sha256>::new(Some(salt), shared_secret);
        let mut out = vec![0u8; output_len];
        hkdf.expand(&[], &mut out)
            .map_err(|e| CryptoError::KeyAgreementFailed(format!("HKDF expansion failed: {e}")))?;
        Ok(SymmetricKey::from_bytes(out))
    }

    /// Derive the 32-byte collection key from a shared secret, using the
    /// context's spec salt
    pub fn derive_collection_key(&self, shared: &SharedSecret) -> Result<SymmetricKey, CryptoError> {
        self.derive_key(self.context.hkdf_salt(), shared.as_bytes(), COLLECTION_KEY_LEN)
    }

    /// Sign a digest with the engine's private key.
    ///
    /// Returns the fixed-width (r,s) encoding sized per the curve.
    pub fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signing_err = |e: p256::ecdsa::Error| CryptoError::SigningFailed(e.to_string());
        match &self.private_key {
            EcPrivateKey::P256(sk) => {
                let signature: p256::ecdsa::Signature = p256::ecdsa::SigningKey::from(sk)
                    .sign_prehash(digest)
                    .map_err(signing_err)?;
                Ok(signature.to_bytes().to_vec())
            }
            EcPrivateKey::P384(sk) => {
                let signature: p384::ecdsa::Signature = p384::ecdsa::SigningKey::from(sk)
                    .sign_prehash(digest)
                    .map_err(signing_err)?;
                Ok(signature.to_bytes().to_vec())
            }
            EcPrivateKey::P521(sk) => {
                let signature: p521::ecdsa::Signature =
                    p521::ecdsa::SigningKey::from_bytes(&sk.to_bytes())
                        .map_err(signing_err)?
                        .sign_prehash(digest)
                        .map_err(signing_err)?;
                Ok(signature.to_bytes().to_vec())
            }
            EcPrivateKey::Secp256k1(sk) => {
                let signature: k256::ecdsa::Signature = k256::ecdsa::SigningKey::from(sk)
                    .sign_prehash(digest)
                    .map_err(signing_err)?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    /// Verify a fixed-width (r,s) signature over a digest.
    ///
    /// Malformed signature bytes and mismatched keys both report `false`;
    /// only the caller decides whether that is an error.
    pub fn verify(digest: &[u8], signature: &[u8], public_key: &EcPublicKey) -> bool {
        match public_key {
            EcPublicKey::P256(pk) => {
                let Ok(sig) = p256::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                p256::ecdsa::VerifyingKey::from(pk)
                    .verify_prehash(digest, &sig)
                    .is_ok()
            }
            EcPublicKey::P384(pk) => {
                let Ok(sig) = p384::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                p384::ecdsa::VerifyingKey::from(pk)
                    .verify_prehash(digest, &sig)
                    .is_ok()
            }
            EcPublicKey::P521(pk) => {
                let Ok(sig) = p521::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                let Ok(vk) =
                    p521::ecdsa::VerifyingKey::from_encoded_point(&pk.to_encoded_point(false))
                else {
                    return false;
                };
                vk.verify_prehash(digest, &sig).is_ok()
            }
            EcPublicKey::Secp256k1(pk) => {
                let Ok(sig) = k256::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                k256::ecdsa::VerifyingKey::from(pk)
                    .verify_prehash(digest, &sig)
                    .is_ok()
            }
        }
    }
}
