//! PostgreSQL-backed `VoteDraftRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::BTreeMap;

use crate::domain::ports::{VoteDraftRepository, VoteDraftRepositoryError};
use crate::domain::{AnswerId, PollId, QuestionId, UserId, VoteDraft};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{VoteDraftRow, VoteDraftUpsert};
use super::pool::DbPool;
use super::schema::vote_drafts;

/// Diesel-backed implementation of the `VoteDraftRepository` port.
#[derive(Clone)]
pub struct DieselVoteDraftRepository {
    pool: DbPool,
}

impl DieselVoteDraftRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> VoteDraftRepositoryError {
    map_diesel_error(
        error,
        VoteDraftRepositoryError::query,
        VoteDraftRepositoryError::connection,
    )
}

fn row_to_draft(row: VoteDraftRow) -> Result<VoteDraft, VoteDraftRepositoryError> {
    let selections: BTreeMap<QuestionId, Vec<AnswerId>> = serde_json::from_value(row.selections)
        .map_err(|e| VoteDraftRepositoryError::query(format!("corrupt draft selections: {e}")))?;
    Ok(VoteDraft::from_parts(
        PollId::from_uuid(row.poll_id),
        UserId::from_uuid(row.user_id),
        selections,
        row.finished_at,
    ))
}

#[async_trait]
impl VoteDraftRepository for DieselVoteDraftRepository {
    async fn find(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<Option<VoteDraft>, VoteDraftRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, VoteDraftRepositoryError::connection))?;

        let row: Option<VoteDraftRow> = vote_drafts::table
            .filter(vote_drafts::poll_id.eq(poll_id.as_uuid()))
            .filter(vote_drafts::user_id.eq(user_id.as_uuid()))
            .select(VoteDraftRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_draft).transpose()
    }

    async fn upsert(&self, draft: &VoteDraft) -> Result<(), VoteDraftRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, VoteDraftRepositoryError::connection))?;

        let selections = serde_json::to_value(draft.selections()).map_err(|e| {
            VoteDraftRepositoryError::query(format!("unserializable draft selections: {e}"))
        })?;
        let row = VoteDraftUpsert {
            poll_id: *draft.poll_id().as_uuid(),
            user_id: *draft.user_id().as_uuid(),
            selections: &selections,
            finished_at: draft.finished_at(),
        };

        // The draft is whole-document state; an upsert replaces every
        // selection at once.
        diesel::insert_into(vote_drafts::table)
            .values(&row)
            .on_conflict((vote_drafts::poll_id, vote_drafts::user_id))
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}
