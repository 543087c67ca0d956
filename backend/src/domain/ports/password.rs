//! Capability ports for password hashing and verification.
//!
//! The domain never touches a KDF directly; services receive these as
//! injected capabilities so tests can swap in cheap deterministic doubles.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing or verification machinery failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Capability to derive a storable hash from a plaintext password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;
}

/// Capability to check a plaintext password against a stored hash.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// Whether `password` matches `hash`. A malformed stored hash is an
    /// error, not a mismatch.
    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}

/// Fixture hasher/verifier using the plaintext prefixed with a marker.
///
/// Only suitable for tests; the marker makes accidental production use
/// obvious in stored data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture-hash:";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{password}")))
    }
}

#[async_trait]
impl PasswordVerifier for FixturePasswordHasher {
    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("{FIXTURE_PREFIX}{password}"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_round_trips() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("secret").await.expect("hashing succeeds");
        assert!(hasher.verify("secret", &hash).await.expect("verify"));
        assert!(!hasher.verify("other", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_hash_is_not_plaintext() {
        let hasher = FixturePasswordHasher;
        let hash = hasher.hash("secret").await.expect("hashing succeeds");
        assert_ne!(hash.as_str(), "secret");
    }
}
