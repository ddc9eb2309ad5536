//! Cryptographic utilities for API key handling and webhook signatures.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new admin API key with the `wb_` prefix.
///
/// The key is 32 random bytes hex-encoded; only its SHA-256 hash is stored.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("wb_{}", hex::encode(bytes))
}

/// Extracts the prefix from an API key (first 8 characters after "wb_").
pub fn extract_key_prefix(key: &str) -> Option<&str> {
    if key.starts_with("wb_") && key.len() >= 11 {
        Some(&key[3..11])
    } else {
        None
    }
}

/// Verifies a Meta webhook signature header against the raw request body.
///
/// The header carries `sha256=<hex hmac>` computed with the app secret.
/// Comparison is constant-time via the Mac verify API.
pub fn verify_webhook_signature(app_secret: &str, body: &[u8], header: &str) -> bool {
    let Some(hex_sig) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Computes the signature header value for a body, used by tests and tooling.
pub fn sign_webhook_body(app_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
