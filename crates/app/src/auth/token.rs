//! Session token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "fr";

/// Number of secret bytes encoded in a session token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

const SESSION_TOKEN_SECRET_HEX_CHARS: usize = SESSION_TOKEN_SECRET_BYTES * 2;

/// Generates an opaque session token.
///
/// Format: `{prefix}_{secret_hex}`. The raw token is shown once at issue
/// time; only its hash is persisted.
#[must_use]
pub fn generate_session_token() -> String {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    format!("{SESSION_TOKEN_PREFIX}_{}", encode_secret_hex(&secret))
}

/// Hashes a raw session token for storage and lookup.
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn encode_secret_hex(secret: &[u8; SESSION_TOKEN_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(SESSION_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(HEX[(byte >> 4) as usize] as char);
        encoded.push(HEX[(byte & 0x0f) as usize] as char);
    }

    encoded
}
