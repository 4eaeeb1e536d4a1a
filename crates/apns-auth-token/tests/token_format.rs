//! Wire format and signature tests for generated provider tokens
//!
//! Tests cover:
//! - Exact header and claims JSON for a known scenario
//! - Segment count, padding and alphabet
//! - ES256 signature verification against the public key
//! - Reproducible generation with a deterministic signer
//! - Construction from configuration, including DER signatures

mod common;

use apns_auth_token::{P256Signer, SignatureFormat, TokenError, TokenSupplier, TokenSupplierConfig};
use common::{
    ISSUER, KEY_ID, decode_segments, deterministic_supplier, signing_input, signing_key, supplier,
    unix,
};
use p256::ecdsa::{Signature, VerifyingKey, signature::Verifier};
use pretty_assertions::assert_eq;

#[test]
fn test_known_scenario() {
    let token = supplier().get_token_at(unix(1_000_000_000)).unwrap();

    let (header, claims, _) = decode_segments(&token);
    assert_eq!(header, r#"{"alg":"ES256","kid":"KEY0123456"}"#);
    assert_eq!(claims, r#"{"iss":"TEAM012345","iat":1000000000}"#);

    assert_eq!(token.matches('.').count(), 2);
    assert!(!token.contains('='));
    assert!(token.starts_with(
        "eyJhbGciOiJFUzI1NiIsImtpZCI6IktFWTAxMjM0NTYifQ.eyJpc3MiOiJURUFNMDEyMzQ1IiwiaWF0IjoxMDAwMDAwMDAwfQ."
    ));
}

#[test]
fn test_segments_use_url_safe_alphabet() {
    let token = supplier().get_token().unwrap();

    for segment in token.split('.') {
        assert!(!segment.is_empty());
        assert!(
            segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
            "unexpected character in segment {segment}"
        );
    }
}

#[test]
fn test_signature_verifies() {
    let token = supplier().get_token_at(unix(1_500_000_000)).unwrap();
    let (_, _, signature) = decode_segments(&token);

    assert_eq!(signature.len(), 64);
    let signature = Signature::from_slice(&signature).unwrap();
    VerifyingKey::from(&signing_key())
        .verify(signing_input(&token).as_bytes(), &signature)
        .unwrap();
}

#[test]
fn test_independent_suppliers_agree() {
    let first = deterministic_supplier().get_token_at(unix(1_000_000_000)).unwrap();
    let second = deterministic_supplier().get_token_at(unix(1_000_000_000)).unwrap();
    assert_eq!(first, second);

    let later = deterministic_supplier().get_token_at(unix(1_000_000_001)).unwrap();
    assert_ne!(first, later);
}

#[test]
fn test_subsecond_hint_truncated() {
    let at = unix(1_000_000_000) + std::time::Duration::from_millis(999);
    let token = supplier().get_token_at(at).unwrap();
    let (_, claims, _) = decode_segments(&token);
    assert_eq!(claims, r#"{"iss":"TEAM012345","iat":1000000000}"#);
}

#[test]
fn test_config_with_der_signatures() {
    let mut config = TokenSupplierConfig::new(ISSUER, KEY_ID);
    config.signature_format = SignatureFormat::Der;

    let supplier = TokenSupplier::from_config(&config, signing_key()).unwrap();
    let token = supplier.get_token_at(unix(1_000_000_000)).unwrap();
    let (_, _, signature) = decode_segments(&token);

    let signature = Signature::from_der(&signature).unwrap();
    VerifyingKey::from(&signing_key())
        .verify(signing_input(&token).as_bytes(), &signature)
        .unwrap();
}

#[test]
fn test_config_errors_surface_at_construction() {
    let mut config = TokenSupplierConfig::new(ISSUER, KEY_ID);
    config.algorithm = "ES512".to_string();
    let err = TokenSupplier::from_config(&config, signing_key()).unwrap_err();
    assert_eq!(
        err,
        TokenError::UnsupportedAlgorithm {
            algorithm: "ES512".to_string()
        }
    );

    let config = TokenSupplierConfig::new(ISSUER, "");
    let err = TokenSupplier::from_config(&config, signing_key()).unwrap_err();
    assert!(matches!(err, TokenError::ConfigurationError { .. }));
}

#[test]
fn test_invalid_key_rejected() {
    let err = P256Signer::from_slice(&[0u8; 32]).unwrap_err();
    assert!(matches!(err, TokenError::InvalidKey { .. }));
    assert!(err.is_construction_error());
}
