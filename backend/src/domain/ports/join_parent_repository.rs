//! Port for organization-to-organization join request persistence.

use async_trait::async_trait;

use crate::domain::{JoinParentRequest, JoinParentRequestId, OrganizationId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by join-parent repository adapters.
    pub enum JoinParentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "join-parent repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "join-parent repository query failed: {message}",
        /// A pending request already exists for this child organization.
        DuplicatePending { message: String } =>
            "join-parent request already pending: {message}",
    }
}

/// Port for the join-parent request lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JoinParentRequestRepository: Send + Sync {
    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: &JoinParentRequestId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError>;

    /// The pending request filed by `child_org_id`, if one exists. At most
    /// one pending request per child is a storage invariant.
    async fn pending_for_child(
        &self,
        child_org_id: &OrganizationId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError>;

    /// Pending requests naming `parent_org_id` as the proposed parent.
    async fn incoming_pending(
        &self,
        parent_org_id: &OrganizationId,
    ) -> Result<Vec<JoinParentRequest>, JoinParentRepositoryError>;

    /// Insert a fresh pending request. A concurrent pending request for the
    /// same child surfaces as
    /// [`JoinParentRepositoryError::DuplicatePending`].
    async fn insert(&self, request: &JoinParentRequest)
    -> Result<(), JoinParentRepositoryError>;

    /// Persist an accepted request and set the child's `parent_id` in the
    /// same transaction. Either both changes land or neither does.
    async fn accept(&self, request: &JoinParentRequest)
    -> Result<(), JoinParentRepositoryError>;

    /// Persist a rejected request.
    async fn reject(&self, request: &JoinParentRequest)
    -> Result<(), JoinParentRepositoryError>;

    /// Remove a request row entirely (requester-side withdrawal).
    async fn delete(&self, id: &JoinParentRequestId) -> Result<(), JoinParentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise join requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureJoinParentRequestRepository;

#[async_trait]
impl JoinParentRequestRepository for FixtureJoinParentRequestRepository {
    async fn find_by_id(
        &self,
        _id: &JoinParentRequestId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
        Ok(None)
    }

    async fn pending_for_child(
        &self,
        _child_org_id: &OrganizationId,
    ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
        Ok(None)
    }

    async fn incoming_pending(
        &self,
        _parent_org_id: &OrganizationId,
    ) -> Result<Vec<JoinParentRequest>, JoinParentRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(
        &self,
        _request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        Ok(())
    }

    async fn accept(
        &self,
        _request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        Ok(())
    }

    async fn reject(
        &self,
        _request: &JoinParentRequest,
    ) -> Result<(), JoinParentRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _id: &JoinParentRequestId) -> Result<(), JoinParentRepositoryError> {
        Ok(())
    }
}
