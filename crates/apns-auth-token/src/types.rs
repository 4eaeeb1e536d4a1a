//! Token header and claims records
//!
//! The signature covers the serialized bytes of these records, so both are
//! formatted by hand in one fixed field order instead of going through a
//! generic serializer. String values are escaped with `serde_json` (no HTML
//! escaping) and `iat` is always written as a JSON integer.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

/// Signing algorithms accepted for provider tokens
///
/// The remote service only accepts ECDSA P-256 with SHA-256, so this enum has
/// a single variant. Any other JWS name is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    /// Elliptic Curve Digital Signature Algorithm with P-256 curve and SHA-256 (RFC 7518)
    #[default]
    #[serde(rename = "ES256")]
    Es256,
}

impl TokenAlgorithm {
    /// Get the algorithm name as specified in RFC 7518
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es256 => crate::ES256,
        }
    }
}

impl fmt::Display for TokenAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenAlgorithm {
    type Err = TokenError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            crate::ES256 => Ok(Self::Es256),
            other => Err(TokenError::UnsupportedAlgorithm {
                algorithm: other.to_string(),
            }),
        }
    }
}

/// JOSE header of a provider token: `{"alg":"ES256","kid":"<key id>"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    /// Signing algorithm
    pub alg: TokenAlgorithm,
    /// Identifier of the signing key, as registered with the remote service
    pub kid: String,
}

impl TokenHeader {
    /// Create a header for the given key identifier
    pub fn new(alg: TokenAlgorithm, kid: impl Into<String>) -> Self {
        Self {
            alg,
            kid: kid.into(),
        }
    }

    /// Canonical JSON form used as signing input
    #[must_use]
    pub fn to_canonical_json(&self) -> String {
        format!(
            "{{\"alg\":{},\"kid\":{}}}",
            json_string(self.alg.as_str()),
            json_string(&self.kid)
        )
    }
}

/// Claims of a provider token: `{"iss":"<issuer>","iat":<seconds>}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Issuer (the provider's team or organization identifier)
    pub iss: String,
    /// Issued-at, whole seconds since the Unix epoch
    pub iat: i64,
}

impl TokenClaims {
    /// Create claims for an issuer at the given issued-at second
    pub fn new(iss: impl Into<String>, iat: i64) -> Self {
        Self {
            iss: iss.into(),
            iat,
        }
    }

    /// Canonical JSON form used as signing input
    #[must_use]
    pub fn to_canonical_json(&self) -> String {
        format!("{{\"iss\":{},\"iat\":{}}}", json_string(&self.iss), self.iat)
    }
}

/// Whole seconds between the Unix epoch and `time`, truncated toward zero.
///
/// Instants before the epoch give negative values.
#[must_use]
pub fn issued_at_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}

fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
