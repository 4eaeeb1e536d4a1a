//! Generate a provider token, then simulate a rejection and regenerate.
//!
//! ```bash
//! RUST_LOG=apns_auth_token=debug cargo run --example generate_token
//! ```

use apns_auth_token::{P256Signer, TokenSupplier};
use p256::pkcs8::{EncodePrivateKey, LineEnding};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Stand-in for the contents of an AuthKey_<KEY ID>.p8 file
    let signing_key = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
    let pem = signing_key.to_pkcs8_pem(LineEnding::LF)?;

    let signer = P256Signer::from_pkcs8_pem(&pem)?;
    let supplier = TokenSupplier::new("TEAM012345", "KEY0123456", signer)?;

    let token = supplier.get_token()?;
    println!("authorization: bearer {token}");

    // The gateway answered 403 ExpiredProviderToken
    supplier.invalidate_token(&token);
    let fresh = supplier.get_token()?;
    println!("authorization: bearer {fresh}");

    Ok(())
}
