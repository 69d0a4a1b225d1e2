//! Argon2id password hashing.
//!
//! Hashes are PHC strings, so the salt and cost parameters are stored with
//! each hash and verification needs nothing else.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashing failed or a stored hash could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("password hash error: {0}")]
pub struct PasswordError(String);

impl From<password_hash::Error> for PasswordError {
    fn from(err: password_hash::Error) -> Self {
        Self(err.to_string())
    }
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// `Ok(false)` on a wrong password; `Err` only for a malformed stored hash.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
