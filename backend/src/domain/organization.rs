//! Organization aggregate.
//!
//! Organizations form a tree: each node holds at most one `parent_id` and the
//! graph stays acyclic because the join-parent workflow refuses to attach a
//! node under itself or any of its descendants. The entity itself never walks
//! the tree; traversal lives in [`crate::domain::hierarchy`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{OrganizationId, UserId};

/// Validation errors returned by [`Organization::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationValidationError {
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for OrganizationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "organization name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "organization name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for OrganizationValidationError {}

/// Maximum allowed length for an organization name.
pub const ORGANIZATION_NAME_MAX: usize = 120;

/// Errors raised by state transitions on an organization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrganizationStateError {
    /// Archival is terminal; a second archive call is a logic error.
    #[error("organization is already archived")]
    AlreadyArchived,
}

/// Node in the governance tree.
///
/// ## Invariants
/// - `name` is trimmed, non-empty, at most [`ORGANIZATION_NAME_MAX`] chars.
/// - `parent_id` never points at the organization itself or a descendant;
///   the join-parent workflow enforces this before calling
///   [`Organization::attach_to_parent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    id: OrganizationId,
    name: String,
    description: Option<String>,
    parent_id: Option<OrganizationId>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
}

impl Organization {
    /// Create a new root organization.
    pub fn create(
        id: OrganizationId,
        name: impl Into<String>,
        description: Option<String>,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrganizationValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(OrganizationValidationError::EmptyName);
        }
        if name.chars().count() > ORGANIZATION_NAME_MAX {
            return Err(OrganizationValidationError::NameTooLong {
                max: ORGANIZATION_NAME_MAX,
            });
        }
        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name,
            description,
            parent_id: None,
            created_by,
            created_at,
            archived_at: None,
        })
    }

    /// Rehydrate from storage without re-validating.
    #[must_use]
    pub fn from_parts(
        id: OrganizationId,
        name: String,
        description: Option<String>,
        parent_id: Option<OrganizationId>,
        created_by: UserId,
        created_at: DateTime<Utc>,
        archived_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            parent_id,
            created_by,
            created_at,
            archived_at,
        }
    }

    /// Organization identifier.
    #[must_use]
    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parent organization, if attached.
    #[must_use]
    pub fn parent_id(&self) -> Option<&OrganizationId> {
        self.parent_id.as_ref()
    }

    /// User who created the organization.
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

    /// Whether the organization has been archived.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Attach this organization under `parent`.
    ///
    /// Callers must have verified `parent` is neither this organization nor
    /// one of its descendants.
    pub fn attach_to_parent(&mut self, parent: OrganizationId) {
        self.parent_id = Some(parent);
    }

    /// Archive the organization (terminal).
    pub fn archive(&mut self, at: DateTime<Utc>) -> Result<(), OrganizationStateError> {
        if self.archived_at.is_some() {
            return Err(OrganizationStateError::AlreadyArchived);
        }
        self.archived_at = Some(at);
        Ok(())
    }
}
