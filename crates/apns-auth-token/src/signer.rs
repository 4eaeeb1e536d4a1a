//! Signing adapter for provider tokens
//!
//! [`TokenSigner`] is the seam between the supplier and whatever holds the
//! private key. [`P256Signer`] is the in-process implementation backed by the
//! `p256` crate; HSM or KMS backends implement the same trait.

use std::fmt;
use std::sync::Arc;

use p256::ecdsa::signature::{RandomizedSigner, Signer};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::{ES256, Result, errors::TokenError};

/// Produces signatures over token signing input
///
/// Implementations are only ever called while the supplier holds its
/// generation lock, so they need not be re-entrant.
pub trait TokenSigner: Send + fmt::Debug {
    /// JWS name of the algorithm this signer implements
    fn algorithm(&self) -> &str;

    /// Sign `message`, returning the signature bytes to be base64url-encoded
    ///
    /// # Errors
    /// Returns [`TokenError::SigningError`] if the signature cannot be produced
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

impl<S: TokenSigner + Sync + ?Sized> TokenSigner for Arc<S> {
    fn algorithm(&self) -> &str {
        (**self).algorithm()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        (**self).sign(message)
    }
}

/// Byte layout of ECDSA signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureFormat {
    /// Fixed-width `r || s` (64 bytes), as JWS requires (RFC 7518 §3.4)
    #[default]
    Fixed,
    /// ASN.1 DER `SEQUENCE { r INTEGER, s INTEGER }`, the layout JCA
    /// `SHA256withECDSA` signers emit
    Der,
}

/// ES256 signer holding a P-256 private key in memory
///
/// Nonces are hedged: RFC 6979 derivation mixed with fresh OS randomness, so
/// re-signing identical input gives a new signature. [`deterministic`](Self::deterministic)
/// switches to pure RFC 6979 for reproducible output.
#[derive(Clone)]
pub struct P256Signer {
    signing_key: SigningKey,
    format: SignatureFormat,
    deterministic: bool,
}

impl P256Signer {
    /// Wrap an existing P-256 signing key
    #[must_use]
    pub fn new(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            format: SignatureFormat::Fixed,
            deterministic: false,
        }
    }

    /// Build a signer from a raw big-endian private scalar
    ///
    /// # Errors
    /// Returns [`TokenError::InvalidKey`] if the bytes are not a valid P-256 scalar
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| TokenError::invalid_key(format!("not a P-256 private scalar: {e}")))?;
        Ok(Self::new(signing_key))
    }

    /// Build a signer from a PKCS#8 DER private key
    ///
    /// # Errors
    /// Returns [`TokenError::InvalidKey`] if the document is malformed or holds
    /// a key for another algorithm or curve
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_pkcs8_der(der)
            .map_err(|e| TokenError::invalid_key(format!("unusable PKCS#8 key: {e}")))?;
        Ok(Self::new(signing_key))
    }

    /// Build a signer from a PEM-armored PKCS#8 private key (`.p8` file contents)
    ///
    /// # Errors
    /// Returns [`TokenError::InvalidKey`] if the PEM or the key inside is unusable
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| TokenError::invalid_key(format!("unusable PKCS#8 PEM key: {e}")))?;
        Ok(Self::new(signing_key))
    }

    /// Select the signature byte layout
    pub fn with_signature_format(mut self, format: SignatureFormat) -> Self {
        self.format = format;
        self
    }

    /// Sign with pure RFC 6979 nonces: the same key and message always give
    /// the same signature
    pub fn deterministic(mut self) -> Self {
        self.deterministic = true;
        self
    }

    /// Whether signatures are reproducible
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Signature byte layout in use
    pub fn signature_format(&self) -> SignatureFormat {
        self.format
    }

    /// Public half of the signing key
    pub fn verifying_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }
}

impl From<SigningKey> for P256Signer {
    fn from(signing_key: SigningKey) -> Self {
        Self::new(signing_key)
    }
}

impl fmt::Debug for P256Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P256Signer")
            .field("signature_format", &self.format)
            .field("deterministic", &self.deterministic)
            .finish_non_exhaustive()
    }
}

impl TokenSigner for P256Signer {
    fn algorithm(&self) -> &str {
        ES256
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signed: std::result::Result<Signature, _> = if self.deterministic {
            self.signing_key.try_sign(message)
        } else {
            self.signing_key.try_sign_with_rng(&mut OsRng, message)
        };
        let signature = signed.map_err(|e| TokenError::SigningError {
            reason: format!("ECDSA P-256 signing failed: {e}"),
        })?;

        Ok(match self.format {
            SignatureFormat::Fixed => signature.to_bytes().to_vec(),
            SignatureFormat::Der => signature.to_der().as_bytes().to_vec(),
        })
    }
}
