//! Port for board persistence.

use async_trait::async_trait;

use crate::domain::{Board, BoardId, OrganizationId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by board repository adapters.
    pub enum BoardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "board repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "board repository query failed: {message}",
    }
}

/// Port for reading and writing boards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Insert or update a board.
    async fn save(&self, board: &Board) -> Result<(), BoardRepositoryError>;

    /// Fetch a board by identifier.
    async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError>;

    /// Boards owned by `org_id`, including archived ones.
    async fn list_for_organization(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Vec<Board>, BoardRepositoryError>;
}

/// Fixture implementation for tests that do not exercise boards.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBoardRepository;

#[async_trait]
impl BoardRepository for FixtureBoardRepository {
    async fn save(&self, _board: &Board) -> Result<(), BoardRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
        Ok(None)
    }

    async fn list_for_organization(
        &self,
        _org_id: &OrganizationId,
    ) -> Result<Vec<Board>, BoardRepositoryError> {
        Ok(Vec::new())
    }
}
