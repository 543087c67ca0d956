//! Board administration domain services.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::authorization::ensure_org_admin;
use crate::domain::ports::{
    BoardCommand, BoardQuery, BoardRepository, BoardRepositoryError, CreateBoardRequest,
    OrganizationRepository, OrganizationRepositoryError, UserRepository,
};
use crate::domain::{Board, BoardId, Error, OrganizationId, UserId};

/// Governance service implementing the board driving ports.
#[derive(Clone)]
pub struct BoardService<O, B, U> {
    orgs: Arc<O>,
    boards: Arc<B>,
    users: Arc<U>,
}

impl<O, B, U> BoardService<O, B, U> {
    /// Create a new service over the given repositories.
    pub fn new(orgs: Arc<O>, boards: Arc<B>, users: Arc<U>) -> Self {
        Self { orgs, boards, users }
    }
}

impl<O, B, U> BoardService<O, B, U>
where
    O: OrganizationRepository,
    B: BoardRepository,
    U: UserRepository,
{
    fn map_org_error(error: OrganizationRepositoryError) -> Error {
        match error {
            OrganizationRepositoryError::Connection { message } => Error::service_unavailable(
                format!("organization repository unavailable: {message}"),
            ),
            OrganizationRepositoryError::Query { message } => {
                Error::internal(format!("organization repository error: {message}"))
            }
        }
    }

    fn map_board_error(error: BoardRepositoryError) -> Error {
        match error {
            BoardRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("board repository unavailable: {message}"))
            }
            BoardRepositoryError::Query { message } => {
                Error::internal(format!("board repository error: {message}"))
            }
        }
    }

    async fn require_active_org(&self, org_id: &OrganizationId) -> Result<(), Error> {
        let organization = self
            .orgs
            .find_by_id(org_id)
            .await
            .map_err(Self::map_org_error)?
            .ok_or_else(|| Error::not_found("organization not found"))?;
        if organization.is_archived() {
            return Err(Error::not_found("organization not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl<O, B, U> BoardCommand for BoardService<O, B, U>
where
    O: OrganizationRepository,
    B: BoardRepository,
    U: UserRepository,
{
    async fn create_board(&self, request: CreateBoardRequest) -> Result<Board, Error> {
        self.require_active_org(&request.organization_id).await?;
        ensure_org_admin(
            self.orgs.as_ref(),
            self.users.as_ref(),
            &request.organization_id,
            &request.actor,
        )
        .await?;

        let board = Board::create(
            BoardId::random(),
            request.organization_id,
            request.name,
            request.general,
            request.actor,
            Utc::now(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.boards
            .save(&board)
            .await
            .map_err(Self::map_board_error)?;
        Ok(board)
    }

    async fn archive_board(&self, board_id: &BoardId, actor: &UserId) -> Result<Board, Error> {
        let mut board = self
            .boards
            .find_by_id(board_id)
            .await
            .map_err(Self::map_board_error)?
            .ok_or_else(|| Error::not_found("board not found"))?;

        let org_id = *board.organization_id();
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), &org_id, actor).await?;

        board
            .archive(Utc::now())
            .map_err(|err| Error::conflict(err.to_string()))?;
        self.boards
            .save(&board)
            .await
            .map_err(Self::map_board_error)?;
        Ok(board)
    }
}

#[async_trait]
impl<O, B, U> BoardQuery for BoardService<O, B, U>
where
    O: OrganizationRepository,
    B: BoardRepository,
    U: UserRepository,
{
    async fn list_boards(
        &self,
        org_id: &OrganizationId,
        actor: &UserId,
    ) -> Result<Vec<Board>, Error> {
        self.require_active_org(org_id).await?;
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), org_id, actor).await?;

        self.boards
            .list_for_organization(org_id)
            .await
            .map_err(Self::map_board_error)
    }
}
