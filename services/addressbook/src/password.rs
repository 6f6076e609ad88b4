//! Argon2 password hashing
//!
//! Hashing and verification are CPU bound, so the async wrappers move the
//! work onto the blocking thread pool.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::sync::OnceLock;
use tracing::error;

/// Hash a password with a fresh random salt, returning a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC string
///
/// An unparsable stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to parse stored password hash: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash used to burn the same verification time when the user does not exist
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password("addressbook-timing-equaliser").ok())
        .as_deref()
}

/// Run a verification that always fails, costing as much as a real one
pub fn verify_against_dummy(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))?
}

/// [`verify_password`] on the blocking pool; `None` stands for an unknown user
pub async fn verify_password_blocking(password: String, password_hash: Option<String>) -> Result<bool> {
    tokio::task::spawn_blocking(move || match password_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            verify_against_dummy(&password);
            false
        }
    })
    .await
    .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))
}
