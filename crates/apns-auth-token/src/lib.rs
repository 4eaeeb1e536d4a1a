//! # APNs Auth Token - ES256 Provider Authentication Tokens
//!
//! Produces and caches the signed bearer credential a provider presents to a
//! token-authenticated push gateway. A token is a compact JWT:
//!
//! ```text
//! base64url({"alg":"ES256","kid":"<key id>"}) . base64url({"iss":"<issuer>","iat":<secs>}) . base64url(signature)
//! ```
//!
//! Every segment is base64url-encoded without `=` padding. The signature is
//! ECDSA over NIST P-256 with SHA-256, computed over the first two segments
//! joined by `.`.
//!
//! ## Core Features
//!
//! - **Canonical serialization** - header and claims are hand-formatted in one
//!   fixed field order, so the signed bytes are reproducible
//! - **Hedged signing** - fresh signature per generation, with an opt-in RFC 6979 deterministic mode
//! - **Caching** - a token is signed once and reused until the caller invalidates it
//! - **Thread safety** - generation is serialized, cache hits are lock-free
//!
//! ## Architecture
//!
//! - `errors` - error taxonomy
//! - `types` - algorithm, header and claims records with canonical JSON
//! - `encoding` - base64url without padding
//! - `signer` - signing seam and the P-256 implementation
//! - `clock` - injectable time source
//! - `config` - serde configuration
//! - `supplier` - the caching token supplier
//!
//! ## Feature Flags
//!
//! - `test-utils` - manual clock, failing signer and fixed keys for tests
//!
//! ## Example
//!
//! ```
//! use apns_auth_token::{P256Signer, TokenSupplier};
//!
//! # fn main() -> apns_auth_token::Result<()> {
//! let signer = P256Signer::from_slice(&[0x17; 32])?;
//! let supplier = TokenSupplier::new("TEAM012345", "KEY0123456", signer)?;
//!
//! let token = supplier.get_token()?;
//! assert_eq!(token.split('.').count(), 3);
//!
//! // The gateway rejected the token: drop it and sign a fresh one.
//! supplier.invalidate_token(&token);
//! let _fresh = supplier.get_token()?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod signer;
pub mod supplier;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export core types for convenience
pub use clock::{Clock, SystemClock};
pub use config::TokenSupplierConfig;
pub use encoding::base64url_encode;
pub use errors::*;
pub use signer::{P256Signer, SignatureFormat, TokenSigner};
pub use supplier::{TokenSupplier, TokenSupplierBuilder};
pub use types::*;

/// Token supplier result type
pub type Result<T> = std::result::Result<T, TokenError>;

/// Separator between the three token segments
pub const SEGMENT_SEPARATOR: char = '.';

/// JWS algorithm name for ECDSA P-256 with SHA-256 (RFC 7518)
pub const ES256: &str = "ES256";
