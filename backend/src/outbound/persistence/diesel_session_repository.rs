//! PostgreSQL-backed `SessionRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SessionRepository, SessionRepositoryError};
use crate::domain::{Session, SessionId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSessionRow, SessionRow};
use super::pool::DbPool;
use super::schema::sessions;

/// Diesel-backed implementation of the `SessionRepository` port.
#[derive(Clone)]
pub struct DieselSessionRepository {
    pool: DbPool,
}

impl DieselSessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> SessionRepositoryError {
    map_diesel_error(
        error,
        SessionRepositoryError::query,
        SessionRepositoryError::connection,
    )
}

fn row_to_session(row: SessionRow) -> Session {
    Session::from_parts(
        SessionId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        row.created_at,
        row.expires_at,
    )
}

#[async_trait]
impl SessionRepository for DieselSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, SessionRepositoryError::connection))?;

        let row = NewSessionRow {
            id: *session.id().as_uuid(),
            user_id: *session.user_id().as_uuid(),
            created_at: session.created_at(),
            expires_at: session.expires_at(),
        };

        diesel::insert_into(sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, SessionRepositoryError::connection))?;

        let row: Option<SessionRow> = sessions::table
            .filter(sessions::id.eq(id.as_uuid()))
            .select(SessionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(row.map(row_to_session))
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, SessionRepositoryError::connection))?;

        diesel::delete(sessions::table.filter(sessions::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), SessionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, SessionRepositoryError::connection))?;

        diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}
