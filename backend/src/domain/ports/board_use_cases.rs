//! Driving ports for board administration.

use async_trait::async_trait;

use crate::domain::{Board, BoardId, Error, OrganizationId, UserId};

/// Validated board-creation payload.
#[derive(Debug, Clone)]
pub struct CreateBoardRequest {
    pub organization_id: OrganizationId,
    pub name: String,
    pub general: bool,
    pub actor: UserId,
}

/// Domain use-case port for creating and archiving boards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardCommand: Send + Sync {
    /// Create a board; the actor must administer the owning organization.
    async fn create_board(&self, request: CreateBoardRequest) -> Result<Board, Error>;

    /// Archive a board (terminal); same authorization as creation.
    async fn archive_board(&self, board_id: &BoardId, actor: &UserId) -> Result<Board, Error>;
}

/// Domain use-case port for reading an organization's boards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoardQuery: Send + Sync {
    /// Boards owned by `org_id`; the actor must administer the organization.
    async fn list_boards(
        &self,
        org_id: &OrganizationId,
        actor: &UserId,
    ) -> Result<Vec<Board>, Error>;
}

/// Fixture command that reports every target as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBoardCommand;

#[async_trait]
impl BoardCommand for FixtureBoardCommand {
    async fn create_board(&self, _request: CreateBoardRequest) -> Result<Board, Error> {
        Err(Error::not_found("organization not found"))
    }

    async fn archive_board(&self, _board_id: &BoardId, _actor: &UserId) -> Result<Board, Error> {
        Err(Error::not_found("board not found"))
    }
}

/// Fixture query with no boards.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBoardQuery;

#[async_trait]
impl BoardQuery for FixtureBoardQuery {
    async fn list_boards(
        &self,
        _org_id: &OrganizationId,
        _actor: &UserId,
    ) -> Result<Vec<Board>, Error> {
        Ok(Vec::new())
    }
}
