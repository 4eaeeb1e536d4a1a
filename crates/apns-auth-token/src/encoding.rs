//! Base64url without padding (RFC 4648 §5, RFC 7515 §2)

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes with the URL-safe alphabet (`-` and `_`) and no `=` padding.
#[must_use]
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
