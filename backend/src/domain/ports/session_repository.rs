//! Port for server-side session persistence.

use async_trait::async_trait;

use crate::domain::{Session, SessionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by session repository adapters.
    pub enum SessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "session repository query failed: {message}",
    }
}

/// Port for issuing, resolving, and revoking sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a freshly issued session.
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError>;

    /// Resolve a session by its opaque identifier.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionRepositoryError>;

    /// Delete one session. Deleting an absent session is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), SessionRepositoryError>;

    /// Revoke every session belonging to `user_id`.
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), SessionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionRepository;

#[async_trait]
impl SessionRepository for FixtureSessionRepository {
    async fn save(&self, _session: &Session) -> Result<(), SessionRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &SessionId,
    ) -> Result<Option<Session>, SessionRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &SessionId) -> Result<(), SessionRepositoryError> {
        Ok(())
    }

    async fn delete_all_for_user(&self, _user_id: &UserId) -> Result<(), SessionRepositoryError> {
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
    async fn fixture_find_returns_none() {
        let repo = FixtureSessionRepository;
        let found = repo
            .find_by_id(&SessionId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = SessionRepositoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
