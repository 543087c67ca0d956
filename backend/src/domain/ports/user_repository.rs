//! Port for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{PhoneNumber, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same phone number already exists.
        DuplicatePhone { message: String } => "phone number already registered: {message}",
    }
}

/// Port for reading and writing registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by normalized phone number.
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Whether a user with this phone number exists.
    async fn exists(&self, phone: &PhoneNumber) -> Result<bool, UserPersistenceError>;

    /// Insert a user record. A phone collision surfaces as
    /// [`UserPersistenceError::DuplicatePhone`].
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_phone(
        &self,
        _phone: &PhoneNumber,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(None)
    }

    async fn exists(&self, _phone: &PhoneNumber) -> Result<bool, UserPersistenceError> {
        Ok(false)
    }

    async fn save(&self, _user: &User) -> Result<(), UserPersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_nothing() {
        let repo = FixtureUserRepository;
        let phone = PhoneNumber::new("+14155550000").expect("valid phone");
        assert!(repo.find_by_phone(&phone).await.expect("fixture").is_none());
        assert!(!repo.exists(&phone).await.expect("fixture"));
    }

    #[rstest]
    fn duplicate_error_formats_message() {
        let err = UserPersistenceError::duplicate_phone("+14155550000");
        assert!(err.to_string().contains("+14155550000"));
    }
}
