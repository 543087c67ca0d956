//! Argon2id password hashing adapter.
//!
//! Implements the `PasswordHasher` and `PasswordVerifier` capability ports
//! with the `argon2` crate's default parameters (Argon2id, PHC string
//! format). The KDF is deliberately slow, so both operations run on the
//! blocking thread pool.

use argon2::password_hash::{PasswordHash as PhcHash, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher, PasswordVerifier};

/// Argon2id-backed hasher and verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a new adapter with the crate's default Argon2id parameters.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &str) -> Result<PasswordHash, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|e| PasswordHashError::hashing(e.to_string()))
}

fn verify_blocking(password: &str, stored: &str) -> Result<bool, PasswordHashError> {
    // A malformed stored hash is corruption, not a wrong password.
    let parsed = PhcHash::new(stored).map_err(|e| PasswordHashError::hashing(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordHashError::hashing(e.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(|e| PasswordHashError::hashing(e.to_string()))?
    }
}

#[async_trait]
impl PasswordVerifier for Argon2PasswordHasher {
    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let stored = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &stored))
            .await
            .map_err(|e| PasswordHashError::hashing(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let adapter = Argon2PasswordHasher::new();
        let hash = adapter.hash("correct horse").await.expect("hashing succeeds");
        assert!(adapter.verify("correct horse", &hash).await.expect("verify"));
        assert!(!adapter.verify("battery staple", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn hash_is_a_phc_string_not_plaintext() {
        let adapter = Argon2PasswordHasher::new();
        let hash = adapter.hash("secret").await.expect("hashing succeeds");
        assert!(hash.as_str().starts_with("$argon2"));
        assert!(!hash.as_str().contains("secret"));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_stored_hash_is_an_error() {
        let adapter = Argon2PasswordHasher::new();
        let stored = PasswordHash::new("not-a-phc-string");
        let err = adapter.verify("secret", &stored).await.expect_err("corrupt hash");
        assert!(matches!(err, PasswordHashError::Hashing { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn salts_differ_between_invocations() {
        let adapter = Argon2PasswordHasher::new();
        let first = adapter.hash("secret").await.expect("hashing succeeds");
        let second = adapter.hash("secret").await.expect("hashing succeeds");
        assert_ne!(first.as_str(), second.as_str());
    }
}
