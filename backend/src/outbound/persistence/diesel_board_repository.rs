//! PostgreSQL-backed `BoardRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BoardRepository, BoardRepositoryError};
use crate::domain::{Board, BoardId, OrganizationId, UserId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BoardRow, BoardUpsert};
use super::pool::DbPool;
use super::schema::boards;

/// Diesel-backed implementation of the `BoardRepository` port.
#[derive(Clone)]
pub struct DieselBoardRepository {
    pool: DbPool,
}

impl DieselBoardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> BoardRepositoryError {
    map_diesel_error(
        error,
        BoardRepositoryError::query,
        BoardRepositoryError::connection,
    )
}

fn row_to_board(row: BoardRow) -> Board {
    Board::from_parts(
        BoardId::from_uuid(row.id),
        OrganizationId::from_uuid(row.organization_id),
        row.name,
        row.general,
        UserId::from_uuid(row.created_by),
        row.created_at,
        row.archived_at,
    )
}

fn board_to_upsert(board: &Board) -> BoardUpsert<'_> {
    BoardUpsert {
        id: *board.id().as_uuid(),
        organization_id: *board.organization_id().as_uuid(),
        name: board.name(),
        general: board.is_general(),
        created_by: *board.created_by().as_uuid(),
        created_at: board.created_at(),
        archived_at: board.archived_at(),
    }
}

#[async_trait]
impl BoardRepository for DieselBoardRepository {
    async fn save(&self, board: &Board) -> Result<(), BoardRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, BoardRepositoryError::connection))?;

        let row = board_to_upsert(board);

        diesel::insert_into(boards::table)
            .values(&row)
            .on_conflict(boards::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, BoardRepositoryError::connection))?;

        let row: Option<BoardRow> = boards::table
            .filter(boards::id.eq(id.as_uuid()))
            .select(BoardRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(row.map(row_to_board))
    }

    async fn list_for_organization(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Vec<Board>, BoardRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_pool_error(e, BoardRepositoryError::connection))?;

        let rows: Vec<BoardRow> = boards::table
            .filter(boards::organization_id.eq(org_id.as_uuid()))
            .order(boards::created_at.asc())
            .select(BoardRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(rows.into_iter().map(row_to_board).collect())
    }
}
