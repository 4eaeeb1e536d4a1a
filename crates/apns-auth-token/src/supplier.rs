//! Caching provider token supplier
//!
//! A [`TokenSupplier`] signs one token lazily and hands the same string back
//! until the caller invalidates it, typically after the remote service
//! rejected it as expired or invalid.
//!
//! Generation runs under a mutex that also guards the signer, so concurrent
//! callers racing on an empty cache produce exactly one token. Once a token is
//! cached, reads go through an atomic pointer and take no lock.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwapOption;
use p256::ecdsa::SigningKey;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    Result, SEGMENT_SEPARATOR,
    clock::{Clock, SystemClock},
    config::{TokenSupplierConfig, validate_identifier},
    encoding::base64url_encode,
    errors::TokenError,
    signer::{P256Signer, TokenSigner},
    types::{TokenAlgorithm, TokenClaims, TokenHeader, issued_at_seconds},
};

/// Produces, caches and invalidates ES256 provider tokens
///
/// Issuer, key id and header are fixed at construction. Only the issued-at
/// claim and the signature differ between generations.
pub struct TokenSupplier {
    issuer: String,
    key_id: String,
    /// base64url of the canonical header, identical for every token
    header_segment: String,
    /// Held for the whole check-generate-store sequence and for invalidation
    signer: Mutex<Box<dyn TokenSigner>>,
    clock: Arc<dyn Clock>,
    token: ArcSwapOption<String>,
}

impl TokenSupplier {
    /// Create a supplier for `issuer` and `key_id` that signs with `signer`
    ///
    /// No token is generated until [`get_token`](Self::get_token) is called.
    ///
    /// # Errors
    /// Returns [`TokenError::ConfigurationError`] if the issuer or key id is
    /// empty or not ASCII, and [`TokenError::UnsupportedAlgorithm`] if the
    /// signer does not implement ES256
    pub fn new(
        issuer: impl Into<String>,
        key_id: impl Into<String>,
        signer: impl TokenSigner + 'static,
    ) -> Result<Self> {
        Self::builder()
            .issuer(issuer)
            .key_id(key_id)
            .signer(signer)
            .build()
    }

    /// Create a supplier from deserialized settings and a P-256 key
    ///
    /// # Errors
    /// Returns the errors of [`TokenSupplierConfig::validate`]
    pub fn from_config(config: &TokenSupplierConfig, signing_key: SigningKey) -> Result<Self> {
        config.validate()?;

        Self::builder()
            .issuer(config.issuer.as_str())
            .key_id(config.key_id.as_str())
            .signer(P256Signer::new(signing_key).with_signature_format(config.signature_format))
            .build()
    }

    /// Start building a supplier
    pub fn builder() -> TokenSupplierBuilder {
        TokenSupplierBuilder::default()
    }

    /// Issuer claim of every token
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Key identifier in every token header
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Return the cached token, signing a new one issued now if there is none
    ///
    /// # Errors
    /// Returns [`TokenError::SigningError`] if a new token had to be signed and
    /// signing failed; the cache stays empty so the next call retries
    pub fn get_token(&self) -> Result<String> {
        self.get_token_with_hint(None)
    }

    /// Return the cached token, signing a new one issued at `issued_at` if there
    /// is none
    ///
    /// `issued_at` is ignored when a token is already cached.
    ///
    /// # Errors
    /// Same as [`get_token`](Self::get_token)
    pub fn get_token_at(&self, issued_at: SystemTime) -> Result<String> {
        self.get_token_with_hint(Some(issued_at))
    }

    /// Return the cached token, or sign a new one issued at the hint (or the
    /// clock's current time when no hint is given)
    ///
    /// # Errors
    /// Same as [`get_token`](Self::get_token)
    pub fn get_token_with_hint(&self, issued_at_hint: Option<SystemTime>) -> Result<String> {
        if let Some(token) = self.token.load_full() {
            return Ok(token.as_ref().clone());
        }

        let signer = self.signer.lock();

        // Another caller may have stored a token while we waited for the lock
        if let Some(token) = self.token.load_full() {
            return Ok(token.as_ref().clone());
        }

        let issued_at = issued_at_seconds(issued_at_hint.unwrap_or_else(|| self.clock.now()));
        let token = self.generate(&**signer, issued_at)?;
        self.token.store(Some(Arc::new(token.clone())));

        debug!(
            key_id = %self.key_id,
            issuer = %self.issuer,
            issued_at,
            "Generated provider authentication token"
        );

        Ok(token)
    }

    /// Discard the cached token if it is exactly `candidate`
    ///
    /// Stale, foreign or empty candidates are ignored, so this is safe to call
    /// with whatever token the remote service rejected.
    pub fn invalidate_token(&self, candidate: &str) {
        let _signer = self.signer.lock();

        let matches = self
            .token
            .load_full()
            .is_some_and(|token| token.as_str() == candidate);

        if matches {
            self.token.store(None);
            debug!(key_id = %self.key_id, "Invalidated provider authentication token");
        } else {
            trace!(key_id = %self.key_id, "Ignored invalidation of a token that is not cached");
        }
    }

    fn generate(&self, signer: &dyn TokenSigner, issued_at: i64) -> Result<String> {
        let claims = TokenClaims::new(self.issuer.as_str(), issued_at).to_canonical_json();

        let mut token = String::with_capacity(self.header_segment.len() + claims.len() * 2 + 90);
        token.push_str(&self.header_segment);
        token.push(SEGMENT_SEPARATOR);
        token.push_str(&base64url_encode(claims.as_bytes()));

        let signature = signer.sign(token.as_bytes()).inspect_err(|e| {
            warn!(
                key_id = %self.key_id,
                category = e.category(),
                error = %e,
                "Failed to sign provider authentication token"
            );
        })?;

        token.push(SEGMENT_SEPARATOR);
        token.push_str(&base64url_encode(&signature));
        Ok(token)
    }
}

impl fmt::Debug for TokenSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSupplier")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .field("clock", &self.clock)
            .field("has_token", &self.token.load().is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`TokenSupplier`]
///
/// Every field except the clock is required; [`build`](Self::build) reports
/// the first one missing.
#[derive(Debug, Default)]
pub struct TokenSupplierBuilder {
    issuer: Option<String>,
    key_id: Option<String>,
    signer: Option<Box<dyn TokenSigner>>,
    clock: Option<Arc<dyn Clock>>,
}

impl TokenSupplierBuilder {
    /// Issuer claim (team or organization identifier)
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Key identifier for the token header
    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Signing backend
    pub fn signer(self, signer: impl TokenSigner + 'static) -> Self {
        self.boxed_signer(Box::new(signer))
    }

    /// Signing backend, already boxed
    pub fn boxed_signer(mut self, signer: Box<dyn TokenSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Sign with an in-memory P-256 key
    pub fn signing_key(self, signing_key: SigningKey) -> Self {
        self.signer(P256Signer::new(signing_key))
    }

    /// Time source for tokens requested without a hint (default: [`SystemClock`])
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Validate the inputs and create the supplier
    ///
    /// # Errors
    /// Returns [`TokenError::ConfigurationError`] if the issuer, key id or
    /// signer is missing, or the issuer or key id is empty or not ASCII;
    /// [`TokenError::UnsupportedAlgorithm`] if the signer is not ES256
    pub fn build(self) -> Result<TokenSupplier> {
        let issuer = self
            .issuer
            .ok_or_else(|| TokenError::configuration("issuer is required"))?;
        validate_identifier("issuer", &issuer)?;

        let key_id = self
            .key_id
            .ok_or_else(|| TokenError::configuration("key id is required"))?;
        validate_identifier("key id", &key_id)?;

        let signer = self
            .signer
            .ok_or_else(|| TokenError::configuration("signing key is required"))?;
        let algorithm: TokenAlgorithm = signer.algorithm().parse()?;

        let header = TokenHeader::new(algorithm, key_id.as_str()).to_canonical_json();
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };

        Ok(TokenSupplier {
            issuer,
            key_id,
            header_segment: base64url_encode(header.as_bytes()),
            signer: Mutex::new(signer),
            clock,
            token: ArcSwapOption::empty(),
        })
    }
}
