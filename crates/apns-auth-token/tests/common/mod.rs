//! Shared helpers for token supplier integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use apns_auth_token::{P256Signer, Result, TokenSigner, TokenSupplier};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use p256::ecdsa::SigningKey;

pub const ISSUER: &str = "TEAM012345";
pub const KEY_ID: &str = "KEY0123456";

/// Fixed P-256 key shared by every test
pub fn signing_key() -> SigningKey {
    SigningKey::from_slice(&[0x2a; 32]).expect("valid P-256 scalar")
}

pub fn supplier() -> TokenSupplier {
    TokenSupplier::new(ISSUER, KEY_ID, P256Signer::new(signing_key())).expect("valid supplier")
}

/// Supplier whose tokens are byte-identical for equal inputs
pub fn deterministic_supplier() -> TokenSupplier {
    let signer = P256Signer::new(signing_key()).deterministic();
    TokenSupplier::new(ISSUER, KEY_ID, signer).expect("valid supplier")
}

pub fn unix(seconds: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(seconds)
}

/// Split a token into its three decoded segments
pub fn decode_segments(token: &str) -> (String, String, Vec<u8>) {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "token must have three segments: {token}");

    let decode = |segment: &str| URL_SAFE_NO_PAD.decode(segment).expect("base64url segment");
    (
        String::from_utf8(decode(parts[0])).expect("ASCII header"),
        String::from_utf8(decode(parts[1])).expect("ASCII claims"),
        decode(parts[2]),
    )
}

/// Everything before the last separator, i.e. the bytes that were signed
pub fn signing_input(token: &str) -> &str {
    let end = token.rfind('.').expect("signature separator");
    &token[..end]
}

/// P-256 signer that counts how often it is asked to sign
#[derive(Debug)]
pub struct CountingSigner {
    inner: P256Signer,
    calls: AtomicUsize,
}

impl CountingSigner {
    pub fn new(inner: P256Signer) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSigner for CountingSigner {
    fn algorithm(&self) -> &str {
        self.inner.algorithm()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign(message)
    }
}
