//! bcrypt hashing for administrator passwords.
//!
//! bcrypt is deliberately slow, so async callers go through the `*_blocking`
//! wrappers that move the work onto tokio's blocking pool.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt reads at most this many bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with a fresh salt.
///
/// # Errors
/// Returns an error if `cost` is outside bcrypt's accepted range.
pub fn hash_password(password: &SecretString, cost: u32) -> Result<String> {
    bcrypt::hash(password.expose_secret(), cost).context("failed to hash password")
}

/// Check a password against a stored hash. A malformed hash is a mismatch.
///
/// bcrypt recomputes the full digest and compares it in constant time, so the
/// cost does not depend on where a mismatch occurs.
#[must_use]
pub fn verify_password(password: &SecretString, hash: &str) -> bool {
    bcrypt::verify(password.expose_secret(), hash).unwrap_or(false)
}

pub(crate) async fn hash_password_blocking(password: SecretString, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .context("password hashing task failed")?
}

pub(crate) async fn verify_password_blocking(password: SecretString, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task failed")
}
