//! Board aggregate.
//!
//! A board is a sub-group inside one organization that owns polls. A board
//! flagged "general" is the implicit all-member board. Archival is terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, OrganizationId, UserId};

/// Validation errors returned by [`Board::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for BoardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "board name must not be empty"),
            Self::NameTooLong { max } => write!(f, "board name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for BoardValidationError {}

/// Maximum allowed length for a board name.
pub const BOARD_NAME_MAX: usize = 120;

/// Errors raised by board state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardStateError {
    /// Archival is terminal and cannot be repeated.
    #[error("board is already archived")]
    AlreadyArchived,
}

/// Poll-owning sub-group of an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    id: BoardId,
    organization_id: OrganizationId,
    name: String,
    general: bool,
    created_by: UserId,
    created_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Create a new board inside `organization_id`.
    pub fn create(
        id: BoardId,
        organization_id: OrganizationId,
        name: impl Into<String>,
        general: bool,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BoardValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(BoardValidationError::EmptyName);
        }
        if name.chars().count() > BOARD_NAME_MAX {
            return Err(BoardValidationError::NameTooLong { max: BOARD_NAME_MAX });
        }
        Ok(Self {
            id,
            organization_id,
            name,
            general,
            created_by,
            created_at,
            archived_at: None,
        })
    }

    /// Rehydrate from storage.
    #[must_use]
    pub fn from_parts(
        id: BoardId,
        organization_id: OrganizationId,
        name: String,
        general: bool,
        created_by: UserId,
        created_at: DateTime<Utc>,
        archived_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            organization_id,
            name,
            general,
            created_by,
            created_at,
            archived_at,
        }
    }

    /// Board identifier.
    #[must_use]
    pub fn id(&self) -> &BoardId {
        &self.id
    }

    /// Owning organization.
    #[must_use]
    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the implicit all-member board.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.general
    }

    /// Admin who created the board.
    #[must_use]
    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Soft-delete marker.
    #[must_use]
    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Whether the board has been archived.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Archive the board (terminal).
    pub fn archive(&mut self, at: DateTime<Utc>) -> Result<(), BoardStateError> {
        if self.archived_at.is_some() {
            return Err(BoardStateError::AlreadyArchived);
        }
        self.archived_at = Some(at);
        Ok(())
    }
}
