use std::fmt::Display;

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use thiserror::Error;

/// Error raised when a password could not be hashed or verified.
#[derive(Debug, Error)]
#[error("password hashing failed")]
pub struct PasswordError(#[from] BcryptError);

/// A salted bcrypt hash of a user's password.
///
/// Registration hashes the plaintext before it reaches the database and login
/// verifies against the stored hash, so the plaintext never leaves the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(raw_password: &str) -> Result<Self, PasswordError> {
        Ok(Self(hash(raw_password, DEFAULT_COST)?))
    }

    /// Wrap a hash string loaded from the database.
    pub fn from_hash(password_hash: String) -> Self {
        Self(password_hash)
    }

    /// Check that `raw_password` matches the stored hash.
    ///
    /// bcrypt's verify compares in constant time with respect to the hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, PasswordError> {
        Ok(verify(raw_password, &self.0)?)
    }

    /// Consume the wrapper, returning the hash string for storage.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
