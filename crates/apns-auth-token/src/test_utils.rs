//! Test utilities for token supplier testing
//!
//! Compiled for this crate's own tests and for downstream crates that enable
//! the `test-utils` feature. Never use these in production code.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use p256::ecdsa::SigningKey;
use parking_lot::Mutex;

use crate::{Clock, P256Signer, Result, TokenError, TokenSigner};

/// Issuer used throughout the tests
pub const TEST_ISSUER: &str = "TEAM012345";

/// Key identifier used throughout the tests
pub const TEST_KEY_ID: &str = "KEY0123456";

/// Fixed, valid P-256 private key so tests share one public key
///
/// # Panics
/// Never in practice; the scalar is a constant known to be valid
pub fn test_signing_key() -> SigningKey {
    // 0x17.. is far below the P-256 group order and non-zero
    match SigningKey::from_slice(&[0x17; 32]) {
        Ok(key) => key,
        Err(e) => panic!("fixed test scalar rejected: {e}"),
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    /// Clock frozen at `start`
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock frozen at the given number of seconds after the Unix epoch
    pub fn at_unix_seconds(seconds: u64) -> Self {
        Self::new(UNIX_EPOCH + Duration::from_secs(seconds))
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Jump to an arbitrary time
    pub fn set(&self, time: SystemTime) {
        *self.now.lock() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}

/// Signer that fails a set number of times before delegating to a real key
#[derive(Debug)]
pub struct FailingSigner {
    inner: P256Signer,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl FailingSigner {
    /// Fail the first `failures` signing attempts
    pub fn new(inner: P256Signer, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never succeed
    pub fn always(inner: P256Signer) -> Self {
        Self::new(inner, usize::MAX)
    }

    /// Number of signing attempts so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenSigner for FailingSigner {
    fn algorithm(&self) -> &str {
        self.inner.algorithm()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok();

        if failing {
            return Err(TokenError::SigningError {
                reason: "simulated key store failure".to_string(),
            });
        }
        self.inner.sign(message)
    }
}

/// Signer that reports any algorithm and returns canned signature bytes
#[derive(Debug, Clone)]
pub struct StaticSigner {
    algorithm: String,
    signature: Vec<u8>,
}

impl StaticSigner {
    /// Report `algorithm` and always "sign" with `signature`
    pub fn new(algorithm: impl Into<String>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            signature: signature.into(),
        }
    }
}

impl TokenSigner for StaticSigner {
    fn algorithm(&self) -> &str {
        &self.algorithm
    }

    fn sign(&self, _message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signature.clone())
    }
}
