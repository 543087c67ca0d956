//! Driving port for staging and finishing vote drafts.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{AnswerId, Error, PollId, QuestionId, UserId, VoteDraft};

/// Validated draft payload: the full selection set to stage.
#[derive(Debug, Clone)]
pub struct SaveDraftRequest {
    pub poll_id: PollId,
    pub user_id: UserId,
    pub selections: BTreeMap<QuestionId, Vec<AnswerId>>,
}

/// Domain use-case port for vote-draft mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VotingCommand: Send + Sync {
    /// Validate the selections against the poll structure and upsert the
    /// draft. Fails conflict once the draft is finished.
    async fn save_draft(&self, request: SaveDraftRequest) -> Result<VoteDraft, Error>;

    /// Lock the draft (terminal). Finishing an absent draft is not-found;
    /// finishing twice is a conflict.
    async fn finish_draft(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<VoteDraft, Error>;
}

/// Fixture command that reports every poll as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVotingCommand;

#[async_trait]
impl VotingCommand for FixtureVotingCommand {
    async fn save_draft(&self, _request: SaveDraftRequest) -> Result<VoteDraft, Error> {
        Err(Error::not_found("poll not found"))
    }

    async fn finish_draft(
        &self,
        _poll_id: &PollId,
        _user_id: &UserId,
    ) -> Result<VoteDraft, Error> {
        Err(Error::not_found("poll not found"))
    }
}
