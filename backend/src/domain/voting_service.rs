//! Vote-draft domain services.
//!
//! Selections are validated against the poll structure on every save: each
//! question id must exist in the poll, each answer id must belong to its
//! question, and single-choice questions accept at most one answer. A save
//! replaces the whole selection set, so retrying a payload is harmless.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    PollRepository, PollRepositoryError, SaveDraftRequest, VoteDraftRepository,
    VoteDraftRepositoryError, VotingCommand,
};
use crate::domain::{Error, PollId, UserId, VoteDraft, VoteDraftError};

/// Governance service implementing the voting driving port.
#[derive(Clone)]
pub struct VotingService<P, D> {
    polls: Arc<P>,
    drafts: Arc<D>,
}

impl<P, D> VotingService<P, D> {
    /// Create a new service over the given repositories.
    pub fn new(polls: Arc<P>, drafts: Arc<D>) -> Self {
        Self { polls, drafts }
    }
}

impl<P, D> VotingService<P, D>
where
    P: PollRepository,
    D: VoteDraftRepository,
{
    fn map_poll_error(error: PollRepositoryError) -> Error {
        match error {
            PollRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("poll repository unavailable: {message}"))
            }
            PollRepositoryError::Query { message } => {
                Error::internal(format!("poll repository error: {message}"))
            }
        }
    }

    fn map_draft_error(error: VoteDraftRepositoryError) -> Error {
        match error {
            VoteDraftRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("vote draft repository unavailable: {message}"))
            }
            VoteDraftRepositoryError::Query { message } => {
                Error::internal(format!("vote draft repository error: {message}"))
            }
        }
    }

    fn map_selection_error(error: VoteDraftError) -> Error {
        match error {
            VoteDraftError::Finished => Error::conflict("vote draft is already finished"),
            VoteDraftError::TooManyAnswers { .. } => Error::invalid_request(error.to_string()),
        }
    }
}

#[async_trait]
impl<P, D> VotingCommand for VotingService<P, D>
where
    P: PollRepository,
    D: VoteDraftRepository,
{
    async fn save_draft(&self, request: SaveDraftRequest) -> Result<VoteDraft, Error> {
        let poll = self
            .polls
            .find_by_id(&request.poll_id)
            .await
            .map_err(Self::map_poll_error)?
            .ok_or_else(|| Error::not_found("poll not found"))?;

        if self
            .polls
            .find_participant(&request.poll_id, &request.user_id)
            .await
            .map_err(Self::map_poll_error)?
            .is_none()
        {
            return Err(Error::forbidden("not a participant in this poll"));
        }

        if let Some(existing) = self
            .drafts
            .find(&request.poll_id, &request.user_id)
            .await
            .map_err(Self::map_draft_error)?
        {
            if existing.is_finished() {
                return Err(Error::conflict("vote draft is already finished"));
            }
        }

        // A save replaces the entire selection set.
        let mut draft = VoteDraft::start(request.poll_id, request.user_id);
        for (question_id, answers) in request.selections {
            let question = poll
                .question(&question_id)
                .ok_or_else(|| {
                    Error::invalid_request(format!("unknown question: {question_id}"))
                })?;
            for answer in &answers {
                if !question.has_answer(answer) {
                    return Err(Error::invalid_request(format!(
                        "answer {answer} does not belong to question {question_id}"
                    )));
                }
            }
            draft
                .set_selection(question_id, question.kind, answers)
                .map_err(Self::map_selection_error)?;
        }

        self.drafts
            .upsert(&draft)
            .await
            .map_err(Self::map_draft_error)?;
        Ok(draft)
    }

    async fn finish_draft(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<VoteDraft, Error> {
        let mut draft = self
            .drafts
            .find(poll_id, user_id)
            .await
            .map_err(Self::map_draft_error)?
            .ok_or_else(|| Error::not_found("vote draft not found"))?;

        draft
            .finish(Utc::now())
            .map_err(Self::map_selection_error)?;
        self.drafts
            .upsert(&draft)
            .await
            .map_err(Self::map_draft_error)?;
        Ok(draft)
    }
}
