//! Salted password hashing.
//!
//! Stored form: `sha256$<salt>$<digest>`, both parts base64 without padding,
//! where digest = SHA-256(salt || password).

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine};
use rand::Rng;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut rng = rand::rng();
    let salt: Vec<u8> = (0..SALT_LEN).map(|_| rng.random::<u8>()).collect();
    encode(&salt, password)
}

/// Checks `password` against a value produced by [`hash_password`].
///
/// Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(SCHEME), Some(salt), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(salt) = STANDARD_NO_PAD.decode(salt) else {
        return false;
    };

    constant_time_eq(encode(&salt, password).as_bytes(), stored.as_bytes())
}

fn encode(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();

    format!(
        "{SCHEME}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(digest)
    )
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
