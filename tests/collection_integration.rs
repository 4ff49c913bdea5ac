//! Collection integration tests
//!
//! End-to-end: build a collection header against a KAS public key, ship the
//! header bytes, re-derive the key on the KAS side, and reuse it through the
//! bounded cache.

use nanotdf::prelude::*;
use nanotdf::{CryptoError, MAX_CACHED_COLLECTIONS};
use sha2::{Digest, Sha256};

fn ctx() -> &'static CryptoContext {
    CryptoContext::global()
}

#[test]
fn test_collection_roundtrip_gmac() {
    let kas = KeyAgreementEngine::generate(EccCurve::P256, ctx());

    let sealed = CollectionBuilder::new()
        .kas_url("https://kas.example.com/kas")
        .policy_plaintext(br#"{"uuid":"abc"}"#.to_vec())
        .build(kas.public_key(), ctx())
        .unwrap();

    // The manifest is sent once per collection
    let header_bytes = sealed.header().to_bytes().unwrap();

    let cache = CollectionKeyCache::new();
    let (header, key) = open_collection_header(&header_bytes, &kas, &cache).unwrap();

    assert_eq!(&header, sealed.header());
    assert_eq!(&key, sealed.key());
    assert_eq!(key.len(), 32);

    // Subsequent envelopes sharing the header skip key agreement
    assert!(cache.get_key(&header).is_cached());
    let (_, again) = open_collection_header(&header_bytes, &kas, &cache).unwrap();
    assert_eq!(again, key);
}

#[test]
fn test_collection_roundtrip_ecdsa_binding_all_curves() {
    for curve in [
        EccCurve::P256,
        EccCurve::P384,
        EccCurve::P521,
        EccCurve::Secp256k1,
    ] {
        let kas = KeyAgreementEngine::generate(curve, ctx());

        let sealed = CollectionBuilder::new()
            .kas_url("https://kas.example.com/kas")
            .policy_plaintext(b"per-curve policy".to_vec())
            .curve(curve)
            .signature_binding(true)
            .build(kas.public_key(), ctx())
            .unwrap();

        assert_eq!(
            sealed.header().policy().binding().len(),
            curve.signature_len()
        );
        assert_eq!(
            sealed.header().ephemeral_public_key().len(),
            curve.compressed_key_len()
        );

        let header_bytes = sealed.header().to_bytes().unwrap();
        let cache = CollectionKeyCache::new();
        let (_, key) = open_collection_header(&header_bytes, &kas, &cache).unwrap();
        assert_eq!(&key, sealed.key());
    }
}

#[test]
fn test_ecdh_symmetry_and_reproducible_derivation() {
    let a = KeyAgreementEngine::generate(EccCurve::P256, ctx());
    let b = KeyAgreementEngine::generate(EccCurve::P256, ctx());

    let shared_ab = a.agree(b.public_key()).unwrap();
    let shared_ba = b.agree(a.public_key()).unwrap();
    assert_eq!(shared_ab.as_bytes(), shared_ba.as_bytes());

    let salt = [0x07u8; 32];
    let k1 = a.derive_key(&salt, shared_ab.as_bytes(), 32).unwrap();
    let k2 = b.derive_key(&salt, shared_ba.as_bytes(), 32).unwrap();
    let k3 = a.derive_key(&salt, shared_ab.as_bytes(), 32).unwrap();
    assert_eq!(k1, k2);
    assert_eq!(k1, k3);
}

#[test]
fn test_sign_verify_across_keys() {
    let signer = KeyAgreementEngine::generate(EccCurve::P256, ctx());
    let digest = Sha256::digest(b"a digest to certify").to_vec();

    let signature = signer.sign(&digest).unwrap();
    assert!(KeyAgreementEngine::verify(
        &digest,
        &signature,
        signer.public_key()
    ));

    let stranger = KeyAgreementEngine::generate(EccCurve::P256, ctx());
    assert!(!KeyAgreementEngine::verify(
        &digest,
        &signature,
        stranger.public_key()
    ));
}

#[test]
fn test_cache_bound_across_collections() {
    let kas = KeyAgreementEngine::generate(EccCurve::P256, ctx());
    let cache = CollectionKeyCache::new();

    // 501 distinct headers: vary the policy content
    let mut first_header = None;
    for i in 0..=MAX_CACHED_COLLECTIONS {
        let sealed = CollectionBuilder::new()
            .kas_url("https://kas.example.com/kas")
            .policy_plaintext(format!(r#"{{"seq":{i}}}"#).into_bytes())
            .build(kas.public_key(), ctx())
            .unwrap();
        let (header, key) = sealed.into_parts();
        cache.store(&header, key);
        if i == 0 {
            first_header = Some(header);
        }
    }

    assert_eq!(cache.len(), MAX_CACHED_COLLECTIONS);
    // The earliest-inserted header was evicted
    assert_eq!(
        cache.get_key(&first_header.unwrap()),
        CollectionKey::NoKey
    );
}

#[test]
fn test_tampered_header_never_yields_a_key() {
    let kas = KeyAgreementEngine::generate(EccCurve::P256, ctx());

    let sealed = CollectionBuilder::new()
        .kas_url("https://kas.example.com/kas")
        .policy_plaintext(b"the policy the sender bound".to_vec())
        .build(kas.public_key(), ctx())
        .unwrap();

    let header_bytes = sealed.header().to_bytes().unwrap();
    let cache = CollectionKeyCache::new();

    // Flip each byte of the embedded policy content in turn; the binding
    // must reject every variant
    let content_start = header_bytes.len() - 33 - 8 - b"the policy the sender bound".len();
    for offset in 0..b"the policy the sender bound".len() {
        let mut tampered = header_bytes.clone();
        tampered[content_start + offset] ^= 0x01;
        let result = open_collection_header(&tampered, &kas, &cache);
        assert!(
            matches!(result, Err(CryptoError::SignatureVerificationFailed)),
            "tampered byte {offset} was not rejected"
        );
    }
    assert!(cache.is_empty());
}
