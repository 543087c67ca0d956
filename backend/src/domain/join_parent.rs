//! Organization-to-organization join request state machine.
//!
//! A child organization's admin asks to attach their org under a proposed
//! parent. The request moves `pending → accepted` (the child's `parent_id` is
//! set in the same repository transaction) or `pending → rejected` (with a
//! required, non-empty reason). Either outcome is terminal for the request,
//! but a rejected or cancelled child may always file a fresh one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{JoinParentRequestId, OrganizationId, UserId};

/// Join-parent request lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JoinParentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinParentStatus {
    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Error returned when parsing an unknown status string from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown join-parent status: {0}")]
pub struct UnknownJoinParentStatus(pub String);

impl std::str::FromStr for JoinParentStatus {
    type Err = UnknownJoinParentStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownJoinParentStatus(other.to_owned())),
        }
    }
}

/// Errors raised by join-parent state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinParentTransitionError {
    /// Accept/reject is only legal while the request is pending.
    #[error("join-parent request is not pending (current status: {current})")]
    NotPending { current: &'static str },
    /// Rejection in this workflow always carries a reason.
    #[error("a rejection reason is required")]
    EmptyReason,
}

/// Request by a child organization to attach under a parent organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinParentRequest {
    id: JoinParentRequestId,
    child_org_id: OrganizationId,
    parent_org_id: OrganizationId,
    requested_by: UserId,
    message: Option<String>,
    status: JoinParentStatus,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    resolved_by: Option<UserId>,
    rejection_reason: Option<String>,
}

impl JoinParentRequest {
    /// Open a new pending request from `child_org_id` towards `parent_org_id`.
    #[must_use]
    pub fn open(
        child_org_id: OrganizationId,
        parent_org_id: OrganizationId,
        requested_by: UserId,
        message: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: JoinParentRequestId::random(),
            child_org_id,
            parent_org_id,
            requested_by,
            message: message.map(|m| m.trim().to_owned()).filter(|m| !m.is_empty()),
            status: JoinParentStatus::Pending,
            created_at,
            resolved_at: None,
            resolved_by: None,
            rejection_reason: None,
        }
    }

    /// Rehydrate from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        id: JoinParentRequestId,
        child_org_id: OrganizationId,
        parent_org_id: OrganizationId,
        requested_by: UserId,
        message: Option<String>,
        status: JoinParentStatus,
        created_at: DateTime<Utc>,
        resolved_at: Option<DateTime<Utc>>,
        resolved_by: Option<UserId>,
        rejection_reason: Option<String>,
    ) -> Self {
        Self {
            id,
            child_org_id,
            parent_org_id,
            requested_by,
            message,
            status,
            created_at,
            resolved_at,
            resolved_by,
            rejection_reason,
        }
    }

    /// Request identifier.
    #[must_use]
    pub fn id(&self) -> &JoinParentRequestId {
        &self.id
    }

    /// Organization asking to be attached.
    #[must_use]
    pub fn child_org_id(&self) -> &OrganizationId {
        &self.child_org_id
    }

    /// Proposed parent organization.
    #[must_use]
    pub fn parent_org_id(&self) -> &OrganizationId {
        &self.parent_org_id
    }

    /// Child-org admin who filed the request.
    #[must_use]
    pub fn requested_by(&self) -> &UserId {
        &self.requested_by
    }

    /// Optional message to the parent-org admins.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> JoinParentStatus {
        self.status
    }

    /// When the request was filed.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the request was accepted or rejected.
    #[must_use]
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Parent-org admin who resolved the request.
    #[must_use]
    pub fn resolved_by(&self) -> Option<&UserId> {
        self.resolved_by.as_ref()
    }

    /// Reason recorded on rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Accept the request. The caller persists the matching `parent_id`
    /// mutation on the child organization in the same transaction.
    pub fn accept(
        &mut self,
        admin: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), JoinParentTransitionError> {
        self.ensure_pending()?;
        self.status = JoinParentStatus::Accepted;
        self.resolved_at = Some(at);
        self.resolved_by = Some(admin);
        Ok(())
    }

    /// Reject the request with a mandatory non-empty reason.
    pub fn reject(
        &mut self,
        admin: UserId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<(), JoinParentTransitionError> {
        self.ensure_pending()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(JoinParentTransitionError::EmptyReason);
        }
        self.status = JoinParentStatus::Rejected;
        self.resolved_at = Some(at);
        self.resolved_by = Some(admin);
        self.rejection_reason = Some(reason.to_owned());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), JoinParentTransitionError> {
        if self.status == JoinParentStatus::Pending {
            Ok(())
        } else {
            Err(JoinParentTransitionError::NotPending {
                current: self.status.as_str(),
            })
        }
    }
}
