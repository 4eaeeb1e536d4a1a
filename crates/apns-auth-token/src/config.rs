//! Token supplier configuration
//!
//! Deserializable settings for building a [`TokenSupplier`](crate::TokenSupplier)
//! from a config file. The private key is supplied separately.

use serde::{Deserialize, Serialize};

use crate::{ES256, Result, errors::TokenError, signer::SignatureFormat, types::TokenAlgorithm};

/// Provider token settings
///
/// ```
/// use apns_auth_token::TokenSupplierConfig;
///
/// let config: TokenSupplierConfig = serde_json::from_str(
///     r#"{"issuer":"TEAM012345","key_id":"KEY0123456"}"#,
/// ).unwrap();
/// assert_eq!(config.algorithm, "ES256");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSupplierConfig {
    /// Issuer claim (team or organization identifier)
    pub issuer: String,
    /// Key identifier placed in the token header
    pub key_id: String,
    /// JWS algorithm name (default: ES256, the only accepted value)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Signature byte layout (default: fixed-width `r || s`)
    #[serde(default)]
    pub signature_format: SignatureFormat,
}

fn default_algorithm() -> String {
    ES256.to_string()
}

impl TokenSupplierConfig {
    /// Configuration with default algorithm and signature format
    pub fn new(issuer: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            key_id: key_id.into(),
            algorithm: default_algorithm(),
            signature_format: SignatureFormat::default(),
        }
    }

    /// Check every field
    ///
    /// # Errors
    /// Returns [`TokenError::ConfigurationError`] for an empty or non-ASCII
    /// issuer or key id, and [`TokenError::UnsupportedAlgorithm`] for any
    /// algorithm other than ES256
    pub fn validate(&self) -> Result<()> {
        validate_identifier("issuer", &self.issuer)?;
        validate_identifier("key id", &self.key_id)?;
        self.algorithm.parse::<TokenAlgorithm>()?;
        Ok(())
    }
}

/// Issuer and key id end up in the ASCII signing input, so both must be
/// non-empty ASCII.
pub(crate) fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(TokenError::configuration(format!("{field} must not be empty")));
    }
    if !value.is_ascii() {
        return Err(TokenError::configuration(format!(
            "{field} must be ASCII, got {value:?}"
        )));
    }
    Ok(())
}
