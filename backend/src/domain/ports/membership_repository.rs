//! Port for organization membership persistence.

use async_trait::async_trait;

use crate::domain::{Membership, OrganizationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "membership repository query failed: {message}",
        /// A pending request already exists for this (organization, user) pair.
        DuplicatePending { message: String } =>
            "membership request already pending: {message}",
    }
}

/// Port for membership rows and the admins' pending queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Fetch the most recent membership row for `(org_id, user_id)`, if any.
    /// Earlier rejected rows stay behind as history.
    async fn find(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError>;

    /// Insert a fresh pending membership. A concurrent pending row for the
    /// same pair surfaces as [`MembershipRepositoryError::DuplicatePending`].
    async fn insert(&self, membership: &Membership) -> Result<(), MembershipRepositoryError>;

    /// Persist a state transition on an existing row.
    async fn update(&self, membership: &Membership) -> Result<(), MembershipRepositoryError>;

    /// Pending requests across `org_ids`, ordered by `requested_at`
    /// ascending. The ordering is part of this contract; callers do not
    /// re-sort.
    async fn pending_for_organizations(
        &self,
        org_ids: &[OrganizationId],
    ) -> Result<Vec<Membership>, MembershipRepositoryError>;
}

/// Fixture implementation for tests that do not exercise memberships.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembershipRepository;

#[async_trait]
impl MembershipRepository for FixtureMembershipRepository {
    async fn find(
        &self,
        _org_id: &OrganizationId,
        _user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _membership: &Membership) -> Result<(), MembershipRepositoryError> {
        Ok(())
    }

    async fn update(&self, _membership: &Membership) -> Result<(), MembershipRepositoryError> {
        Ok(())
    }

    async fn pending_for_organizations(
        &self,
        _org_ids: &[OrganizationId],
    ) -> Result<Vec<Membership>, MembershipRepositoryError> {
        Ok(Vec::new())
    }
}
