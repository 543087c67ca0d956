//! Port for staged vote-draft persistence.

use async_trait::async_trait;

use crate::domain::{PollId, UserId, VoteDraft};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by vote-draft repository adapters.
    pub enum VoteDraftRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "vote draft repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "vote draft repository query failed: {message}",
    }
}

/// Port keyed by `(poll, user)`; one draft per voter per poll.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteDraftRepository: Send + Sync {
    /// Fetch the draft for `(poll_id, user_id)`, if one was started.
    async fn find(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<Option<VoteDraft>, VoteDraftRepositoryError>;

    /// Insert or replace the draft for its `(poll, user)` key.
    async fn upsert(&self, draft: &VoteDraft) -> Result<(), VoteDraftRepositoryError>;
}

/// Fixture implementation for tests that do not exercise vote drafts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVoteDraftRepository;

#[async_trait]
impl VoteDraftRepository for FixtureVoteDraftRepository {
    async fn find(
        &self,
        _poll_id: &PollId,
        _user_id: &UserId,
    ) -> Result<Option<VoteDraft>, VoteDraftRepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _draft: &VoteDraft) -> Result<(), VoteDraftRepositoryError> {
        Ok(())
    }
}
