//! PostgreSQL-backed `PollRepository` implementation using Diesel.
//!
//! Poll structure (pages, questions, answers) is stored as a JSONB document;
//! only ownership and participant enrolment get relational columns.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PollRepository, PollRepositoryError};
use crate::domain::{BoardId, Participant, Poll, PollId, PollPage, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPollRow, ParticipantRow, PollRow};
use super::pool::DbPool;
use super::schema::{poll_participants, polls};

/// Diesel-backed implementation of the `PollRepository` port.
#[derive(Clone)]
pub struct DieselPollRepository {
    pool: DbPool,
}

impl DieselPollRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> PollRepositoryError {
    map_diesel_error(
        error,
        PollRepositoryError::query,
        PollRepositoryError::connection,
    )
}

fn row_to_poll(row: PollRow) -> Result<Poll, PollRepositoryError> {
    let pages: Vec<PollPage> = serde_json::from_value(row.pages)
        .map_err(|e| PollRepositoryError::query(format!("corrupt poll pages: {e}")))?;
    Ok(Poll::new(
        PollId::from_uuid(row.id),
        BoardId::from_uuid(row.board_id),
        row.title,
        pages,
        row.created_at,
    ))
}

fn row_to_participant(row: ParticipantRow) -> Result<Participant, PollRepositoryError> {
    let weight = u32::try_from(row.weight)
        .map_err(|_| PollRepositoryError::query("negative participant weight"))?;
    Ok(Participant {
        poll_id: PollId::from_uuid(row.poll_id),
        user_id: UserId::from_uuid(row.user_id),
        weight,
    })
}

#[async_trait]
impl PollRepository for DieselPollRepository {
    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, PollRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PollRepositoryError::connection))?;

        let row: Option<PollRow> = polls::table
            .filter(polls::id.eq(id.as_uuid()))
            .select(PollRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_poll).transpose()
    }

    async fn save(&self, poll: &Poll) -> Result<(), PollRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PollRepositoryError::connection))?;

        let pages = serde_json::to_value(poll.pages())
            .map_err(|e| PollRepositoryError::query(format!("unserializable poll pages: {e}")))?;
        let row = NewPollRow {
            id: *poll.id().as_uuid(),
            board_id: *poll.board_id().as_uuid(),
            title: poll.title(),
            pages: &pages,
            created_at: poll.created_at(),
        };

        diesel::insert_into(polls::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_participant(
        &self,
        poll_id: &PollId,
        user_id: &UserId,
    ) -> Result<Option<Participant>, PollRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, PollRepositoryError::connection))?;

        let row: Option<ParticipantRow> = poll_participants::table
            .filter(poll_participants::poll_id.eq(poll_id.as_uuid()))
            .filter(poll_participants::user_id.eq(user_id.as_uuid()))
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_participant).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    fn pages_deserialize_from_the_stored_document() {
        let question = Uuid::new_v4();
        let answer = Uuid::new_v4();
        let row = PollRow {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            title: "Budget 2026".to_owned(),
            pages: json!([{
                "questions": [{
                    "id": question,
                    "text": "Approve the budget?",
                    "kind": "single-choice",
                    "answers": [{ "id": answer, "text": "Yes" }],
                }],
            }]),
            created_at: Utc::now(),
        };
        let poll = row_to_poll(row).expect("valid document");
        assert_eq!(poll.pages().len(), 1);
        assert!(poll.question(&crate::domain::QuestionId::from_uuid(question)).is_some());
    }

    #[rstest]
    fn corrupt_pages_document_is_a_query_error() {
        let row = PollRow {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            title: "Broken".to_owned(),
            pages: json!({ "not": "a list" }),
            created_at: Utc::now(),
        };
        let err = row_to_poll(row).expect_err("corrupt document");
        assert!(matches!(err, PollRepositoryError::Query { .. }));
    }

    #[rstest]
    fn participant_weight_converts_to_unsigned() {
        let row = ParticipantRow {
            poll_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight: 3,
        };
        let participant = row_to_participant(row).expect("valid weight");
        assert_eq!(participant.weight, 3);
    }

    #[rstest]
    fn negative_weight_is_a_query_error() {
        let row = ParticipantRow {
            poll_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            weight: -1,
        };
        let err = row_to_participant(row).expect_err("corrupt weight");
        assert!(matches!(err, PollRepositoryError::Query { .. }));
    }
}
