//! Argon2id password hashing adapter.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes with Argon2id default parameters and a random salt, storing PHC
/// strings. Work runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &[u8]) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_blocking(password: &[u8], stored: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(stored).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::malformed_hash(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let stored = hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &stored))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
    }
}
