//! Driving ports for the organization-to-organization join workflow.

use async_trait::async_trait;

use crate::domain::{
    Error, JoinParentRequest, JoinParentRequestId, OrganizationId, ReviewAction, UserId,
};

/// Validated join-parent request payload.
#[derive(Debug, Clone)]
pub struct RequestJoinParentRequest {
    pub child_org_id: OrganizationId,
    pub parent_org_id: OrganizationId,
    pub actor: UserId,
    pub message: Option<String>,
}

/// Domain use-case port for filing and resolving join-parent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HierarchyCommand: Send + Sync {
    /// File a pending request to attach a child under a parent. The actor
    /// must administer the child; the parent must exist and must not be the
    /// child or any of its descendants.
    async fn request_join_parent(
        &self,
        request: RequestJoinParentRequest,
    ) -> Result<JoinParentRequest, Error>;

    /// Accept or reject a pending request. `actor` must administer the
    /// proposed parent; rejection requires a non-empty reason.
    async fn handle_request(
        &self,
        id: &JoinParentRequestId,
        actor: &UserId,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<JoinParentRequest, Error>;

    /// Withdraw a pending request from the child side; the row is deleted.
    async fn cancel_request(
        &self,
        id: &JoinParentRequestId,
        actor: &UserId,
    ) -> Result<(), Error>;
}

/// Domain use-case port for reading the parent side of the workflow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HierarchyQuery: Send + Sync {
    /// Pending requests naming `parent_org_id` as the proposed parent. The
    /// actor must administer that organization.
    async fn incoming_requests(
        &self,
        parent_org_id: &OrganizationId,
        actor: &UserId,
    ) -> Result<Vec<JoinParentRequest>, Error>;
}

/// Fixture command that reports every organization as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHierarchyCommand;

#[async_trait]
impl HierarchyCommand for FixtureHierarchyCommand {
    async fn request_join_parent(
        &self,
        _request: RequestJoinParentRequest,
    ) -> Result<JoinParentRequest, Error> {
        Err(Error::not_found("child organization not found"))
    }

    async fn handle_request(
        &self,
        _id: &JoinParentRequestId,
        _actor: &UserId,
        _action: ReviewAction,
        _reason: Option<String>,
    ) -> Result<JoinParentRequest, Error> {
        Err(Error::not_found("join request not found"))
    }

    async fn cancel_request(
        &self,
        _id: &JoinParentRequestId,
        _actor: &UserId,
    ) -> Result<(), Error> {
        Err(Error::not_found("join request not found"))
    }
}

/// Fixture query with no incoming requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHierarchyQuery;

#[async_trait]
impl HierarchyQuery for FixtureHierarchyQuery {
    async fn incoming_requests(
        &self,
        _parent_org_id: &OrganizationId,
        _actor: &UserId,
    ) -> Result<Vec<JoinParentRequest>, Error> {
        Ok(Vec::new())
    }
}
