//! Token supplier error types

use thiserror::Error;

/// Errors raised while constructing a [`TokenSupplier`](crate::TokenSupplier)
/// or generating a token.
///
/// Construction errors (`ConfigurationError`, `UnsupportedAlgorithm`,
/// `InvalidKey`) are caller-fixable and never retried internally.
/// `SigningError` is reported per call and leaves the token cache untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// A required construction input is missing or malformed
    #[error("Configuration error: {reason}")]
    ConfigurationError {
        /// What was wrong with the input
        reason: String,
    },

    /// The signing context does not provide the required algorithm
    #[error("Unsupported signing algorithm: {algorithm} (only ES256 is supported)")]
    UnsupportedAlgorithm {
        /// Algorithm name that was offered
        algorithm: String,
    },

    /// The private key cannot be used for ES256 signing
    #[error("Invalid signing key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// The signing operation failed while generating a token
    #[error("Signing failed: {reason}")]
    SigningError {
        /// Underlying cryptographic failure
        reason: String,
    },
}

impl TokenError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised while building the supplier
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError { .. }
                | Self::UnsupportedAlgorithm { .. }
                | Self::InvalidKey { .. }
        )
    }

    /// Stable label for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::ConfigurationError { .. } => "configuration",
            Self::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            Self::InvalidKey { .. } => "invalid_key",
            Self::SigningError { .. } => "signing",
        }
    }
}
