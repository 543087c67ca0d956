//! Organization membership state machine.
//!
//! A user's relationship with an organization moves `pending → member` on
//! acceptance or `pending → rejected` on rejection, never back. Unlike the
//! join-parent workflow, the rejection reason here is optional — the source
//! workflows differ deliberately and the asymmetry is preserved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{OrganizationId, UserId};

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Accept,
    Reject,
}

/// Membership lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Awaiting an admin decision.
    Pending,
    /// Accepted into the organization.
    Member,
    /// Rejected; a new request may still be filed later.
    Rejected,
}

impl MembershipStatus {
    /// Storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Member => "member",
            Self::Rejected => "rejected",
        }
    }
}

/// Error returned when parsing an unknown status string from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown membership status: {0}")]
pub struct UnknownMembershipStatus(pub String);

impl std::str::FromStr for MembershipStatus {
    type Err = UnknownMembershipStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "member" => Ok(Self::Member),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownMembershipStatus(other.to_owned())),
        }
    }
}

/// Errors raised by membership state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MembershipTransitionError {
    /// Accept/reject is only legal while the request is pending.
    #[error("membership request is not pending (current status: {current})")]
    NotPending { current: &'static str },
}

/// Membership row tying a user to an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    organization_id: OrganizationId,
    user_id: UserId,
    status: MembershipStatus,
    requested_at: DateTime<Utc>,
    joined_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    rejected_by: Option<UserId>,
}

impl Membership {
    /// Open a new pending request.
    #[must_use]
    pub fn request(
        organization_id: OrganizationId,
        user_id: UserId,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            organization_id,
            user_id,
            status: MembershipStatus::Pending,
            requested_at,
            joined_at: None,
            rejected_at: None,
            rejection_reason: None,
            rejected_by: None,
        }
    }

    /// Rehydrate from storage.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        organization_id: OrganizationId,
        user_id: UserId,
        status: MembershipStatus,
        requested_at: DateTime<Utc>,
        joined_at: Option<DateTime<Utc>>,
        rejected_at: Option<DateTime<Utc>>,
        rejection_reason: Option<String>,
        rejected_by: Option<UserId>,
    ) -> Self {
        Self {
            organization_id,
            user_id,
            status,
            requested_at,
            joined_at,
            rejected_at,
            rejection_reason,
            rejected_by,
        }
    }

    /// Organization side of the relationship.
    #[must_use]
    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    /// User side of the relationship.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    /// When the request was filed; pending queues sort on this, ascending.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// When the user became a member, if accepted.
    #[must_use]
    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.joined_at
    }

    /// When the request was rejected, if rejected.
    #[must_use]
    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Optional reason recorded on rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Admin who rejected the request, if rejected.
    #[must_use]
    pub fn rejected_by(&self) -> Option<&UserId> {
        self.rejected_by.as_ref()
    }

    /// Accept the pending request, recording the join timestamp.
    pub fn accept(&mut self, at: DateTime<Utc>) -> Result<(), MembershipTransitionError> {
        self.ensure_pending()?;
        self.status = MembershipStatus::Member;
        self.joined_at = Some(at);
        Ok(())
    }

    /// Reject the pending request. The reason is optional in this workflow.
    pub fn reject(
        &mut self,
        admin: UserId,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), MembershipTransitionError> {
        self.ensure_pending()?;
        self.status = MembershipStatus::Rejected;
        self.rejected_at = Some(at);
        self.rejected_by = Some(admin);
        self.rejection_reason = reason.map(|r| r.trim().to_owned()).filter(|r| !r.is_empty());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), MembershipTransitionError> {
        if self.status == MembershipStatus::Pending {
            Ok(())
        } else {
            Err(MembershipTransitionError::NotPending {
                current: self.status.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn pending() -> Membership {
        Membership::request(OrganizationId::random(), UserId::random(), Utc::now())
    }

    #[test]
    fn accept_moves_pending_to_member() {
        let mut membership = pending();
        let at = Utc::now();
        membership.accept(at).expect("pending can be accepted");
        assert_eq!(membership.status(), MembershipStatus::Member);
        assert_eq!(membership.joined_at(), Some(at));
        assert_eq!(membership.rejected_at(), None);
    }

    #[test]
    fn reject_records_admin_and_optional_reason() {
        let mut membership = pending();
        let admin = UserId::random();
        membership
            .reject(admin, Some("insufficient members".to_owned()), Utc::now())
            .expect("pending can be rejected");
        assert_eq!(membership.status(), MembershipStatus::Rejected);
        assert_eq!(membership.rejected_by(), Some(&admin));
        assert_eq!(membership.rejection_reason(), Some("insufficient members"));
    }

    #[test]
    fn reject_without_reason_is_allowed() {
        let mut membership = pending();
        membership
            .reject(UserId::random(), None, Utc::now())
            .expect("reason is optional here");
        assert_eq!(membership.rejection_reason(), None);
    }

    #[test]
    fn blank_reason_collapses_to_none() {
        let mut membership = pending();
        membership
            .reject(UserId::random(), Some("   ".to_owned()), Utc::now())
            .expect("pending can be rejected");
        assert_eq!(membership.rejection_reason(), None);
    }

    #[rstest]
    #[case(MembershipStatus::Member)]
    #[case(MembershipStatus::Rejected)]
    fn no_transition_out_of_terminal_states(#[case] terminal: MembershipStatus) {
        let mut membership = pending();
        match terminal {
            MembershipStatus::Member => membership.accept(Utc::now()).expect("accept"),
            MembershipStatus::Rejected => membership
                .reject(UserId::random(), None, Utc::now())
                .expect("reject"),
            MembershipStatus::Pending => unreachable!(),
        }

        let err = membership.accept(Utc::now()).expect_err("terminal state");
        assert_eq!(
            err,
            MembershipTransitionError::NotPending {
                current: terminal.as_str()
            }
        );
        assert!(
            membership
                .reject(UserId::random(), None, Utc::now())
                .is_err()
        );
    }

    #[rstest]
    #[case("pending", MembershipStatus::Pending)]
    #[case("member", MembershipStatus::Member)]
    #[case("rejected", MembershipStatus::Rejected)]
    fn status_round_trips_through_storage_strings(
        #[case] raw: &str,
        #[case] expected: MembershipStatus,
    ) {
        assert_eq!(raw.parse::<MembershipStatus>().expect("known"), expected);
        assert_eq!(expected.as_str(), raw);
    }
}
