//! Driving ports for organization creation and membership workflows.

use async_trait::async_trait;

use crate::domain::{Error, Membership, Organization, OrganizationId, ReviewAction, UserId};

/// Validated organization-creation payload.
#[derive(Debug, Clone)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub description: Option<String>,
    pub created_by: UserId,
}

/// Domain use-case port for creating organizations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationCommand: Send + Sync {
    /// Create an organization with the creator as its first admin.
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, Error>;
}

/// Domain use-case port for membership requests and their review.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// File a pending membership request; a second pending request for the
    /// same pair is a conflict.
    async fn join_organization(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Membership, Error>;

    /// Accept or reject a pending request. `actor` must administer the
    /// organization. The rejection reason is optional in this workflow.
    async fn handle_join_request(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
        actor: &UserId,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<Membership, Error>;
}

/// Domain use-case port for the admins' pending-request queue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PendingRequestsQuery: Send + Sync {
    /// Pending membership requests across every organization `actor`
    /// administers, oldest first.
    async fn pending_requests(&self, actor: &UserId) -> Result<Vec<Membership>, Error>;
}

/// Fixture command that materialises the request without persisting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrganizationCommand;

#[async_trait]
impl OrganizationCommand for FixtureOrganizationCommand {
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, Error> {
        Organization::create(
            OrganizationId::random(),
            &request.name,
            request.description,
            request.created_by,
            chrono::Utc::now(),
        )
        .map_err(|error| Error::invalid_request(error.to_string()))
    }
}

/// Fixture command that refuses every mutation with not-found.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMembershipCommand;

#[async_trait]
impl MembershipCommand for FixtureMembershipCommand {
    async fn join_organization(
        &self,
        _org_id: &OrganizationId,
        _user_id: &UserId,
    ) -> Result<Membership, Error> {
        Err(Error::not_found("organization not found"))
    }

    async fn handle_join_request(
        &self,
        _org_id: &OrganizationId,
        _user_id: &UserId,
        _actor: &UserId,
        _action: ReviewAction,
        _reason: Option<String>,
    ) -> Result<Membership, Error> {
        Err(Error::not_found("membership request not found"))
    }
}

/// Fixture query with an empty queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePendingRequestsQuery;

#[async_trait]
impl PendingRequestsQuery for FixturePendingRequestsQuery {
    async fn pending_requests(&self, _actor: &UserId) -> Result<Vec<Membership>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[tokio::test]
    async fn fixture_join_reports_not_found() {
        let err = FixtureMembershipCommand
            .join_organization(&OrganizationId::random(), &UserId::random())
            .await
            .expect_err("fixture join always fails");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_queue_is_empty() {
        let queue = FixturePendingRequestsQuery
            .pending_requests(&UserId::random())
            .await
            .expect("fixture query succeeds");
        assert!(queue.is_empty());
    }
}
