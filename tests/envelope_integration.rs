//! Envelope wire-format integration tests
//!
//! Exercises the header/policy/locator layer through the public SDK surface:
//! hand-built byte images, byte-identical re-serialization, and the format's
//! failure modes.

use nanotdf::prelude::*;
use nanotdf::{ProtocolError, MAGIC_NUMBER_AND_VERSION};

/// Header encoding an HTTPS KAS locator `kas.example.com` with no
/// identifier, P-256 mode without signature binding, AES-256-GCM-96, an
/// embedded plaintext policy `{"uuid":"abc"}`, and an all-zero 8-byte
/// binding.
fn hand_built_header() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC_NUMBER_AND_VERSION);
    bytes.push(0x10); // HTTPS, no identifier
    bytes.push(15);
    bytes.extend_from_slice(b"kas.example.com");
    bytes.push(0x00); // P-256, GMAC binding
    bytes.push(0x10); // AES-256-GCM-96, size class 0
    bytes.push(0x01); // embedded plaintext policy
    bytes.extend_from_slice(&14u32.to_be_bytes());
    bytes.extend_from_slice(br#"{"uuid":"abc"}"#);
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.push(0x02);
    bytes.extend_from_slice(&[0x44; 32]);
    bytes
}

#[test]
fn test_parse_hand_built_header() {
    let header = Header::parse(&hand_built_header()).expect("hand-built header should parse");

    assert_eq!(header.policy().policy_type(), PolicyType::EmbeddedPlaintext);
    assert_eq!(
        header.policy().plaintext_body().unwrap(),
        br#"{"uuid":"abc"}"#
    );
    assert_eq!(header.kas().to_url().unwrap(), "https://kas.example.com");
    assert_eq!(header.mode().curve(), EccCurve::P256);
    assert_eq!(header.payload_config().cipher(), SymmetricCipher::Aes256Gcm96);
}

#[test]
fn test_reserialized_header_is_byte_identical() {
    let bytes = hand_built_header();
    let header = Header::parse(&bytes).unwrap();

    assert_eq!(header.to_bytes().unwrap(), bytes);
    assert_eq!(header.serialized_size(), bytes.len());
}

#[test]
fn test_bad_magic_rejected() {
    let mut bytes = hand_built_header();
    for i in 0..3 {
        let mut corrupted = bytes.clone();
        corrupted[i] ^= 0xFF;
        assert!(matches!(
            Header::parse(&corrupted),
            Err(ProtocolError::BadMagicNumber(_))
        ));
    }
    // And an entirely different prefix
    bytes[0] = b'P';
    bytes[1] = b'K';
    assert!(matches!(
        Header::parse(&bytes),
        Err(ProtocolError::BadMagicNumber(_))
    ));
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let bytes = hand_built_header();
    for len in 0..bytes.len() {
        let result = Header::parse(&bytes[..len]);
        assert!(result.is_err(), "prefix of {len} bytes should not parse");
    }
}

#[test]
fn test_structural_roundtrip_with_identifier_and_remote_policy() {
    let kas = ResourceLocator::from_url("https://kas.example.com/kas")
        .unwrap()
        .with_identifier(vec![0xDE; 8])
        .unwrap();
    let policy_locator = ResourceLocator::from_url("https://policy.example.com/p/7").unwrap();
    let policy = PolicyInfo::remote(policy_locator, vec![0x99; 8]);
    let header = Header::new(
        kas,
        KeyAgreementMode::new(EccCurve::P256, false),
        PayloadConfig::new(SymmetricCipher::Aes256Gcm128, 2),
        policy,
        vec![0x02; 33],
    )
    .unwrap();

    let bytes = header.to_bytes().unwrap();
    let decoded = Header::parse(&bytes).unwrap();
    assert_eq!(decoded, header);
    assert_eq!(
        decoded.policy().remote_url().unwrap(),
        "https://policy.example.com/p/7"
    );
    assert_eq!(decoded.kas().identifier(), Some(&[0xDE; 8][..]));
}

#[test]
fn test_key_access_policy_variant_fails_closed() {
    let mut bytes = hand_built_header();
    // Rewrite the policy type byte to the key-access variant
    bytes[20] = 0x03;
    assert!(matches!(
        Header::parse(&bytes),
        Err(ProtocolError::UnsupportedPolicyVariant(0x03))
    ));
}

#[test]
fn test_locator_slice_serialization() {
    let locator = ResourceLocator::from_url("https://kas.example.com/kas").unwrap();
    let mut exact = vec![0u8; locator.serialized_size()];
    assert_eq!(
        locator.write_to_slice(&mut exact).unwrap(),
        locator.serialized_size()
    );

    let mut short = vec![0u8; locator.serialized_size() - 1];
    assert!(matches!(
        locator.write_to_slice(&mut short),
        Err(ProtocolError::BufferTooSmall { .. })
    ));
}
