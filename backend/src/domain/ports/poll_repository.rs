//! Port for poll structure and participant reads.

use async_trait::async_trait;

use crate::domain::{Participant, Poll, PollId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by poll repository adapters.
    pub enum PollRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "poll repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "poll repository query failed: {message}",
    }
}

/// Port for polls and their participant weight snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Fetch a poll with its full page/question/answer structure.
    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, PollRepositoryError>;

    /// Insert or update a poll.
    async fn save(&self, poll: &Poll) -> Result<(), PollRepositoryError>;

    /// Fetch the participant record for `(poll_id, user_id)`, if enrolled.
    async fn find_participant(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, PollRepositoryError>;
}

/// Fixture implementation for tests that do not exercise polls.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePollRepository;

#[async_trait]
impl PollRepository for FixturePollRepository {
    async fn find_by_id(&self, _id: &PollId) -> Result<Option<Poll>, PollRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _poll: &Poll) -> Result<(), PollRepositoryError> {
        Ok(())
    }

    async fn find_participant(
        &self,
        _poll_id: &PollId,
        _user_id: &UserId,
    ) -> Result<Option<Participant>, PollRepositoryError> {
        Ok(None)
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
        let repo = FixturePollRepository;
        let poll = PollId::random();
        assert!(repo.find_by_id(&poll).await.expect("fixture").is_none());
        assert!(
            repo.find_participant(&poll, &UserId::random())
                .await
                .expect("fixture")
                .is_none()
        );
    }
}
