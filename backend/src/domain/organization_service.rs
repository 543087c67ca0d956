//! Organization and membership domain services.
//!
//! Implements organization creation, the membership request workflow, and the
//! admins' pending queue. The organization creator is granted the admin role
//! in the same operation; a rejected membership never blocks a fresh request,
//! while a pending one does.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::authorization::ensure_org_admin;
use crate::domain::ports::{
    CreateOrganizationRequest, MembershipCommand, MembershipRepository,
    MembershipRepositoryError, OrganizationCommand, OrganizationRepository,
    OrganizationRepositoryError, PendingRequestsQuery, UserRepository,
};
use crate::domain::{
    Error, Membership, MembershipStatus, Organization, OrganizationId, ReviewAction, UserId,
};

/// Governance service implementing the organization and membership ports.
#[derive(Clone)]
pub struct OrganizationService<O, M, U> {
    orgs: Arc<O>,
    memberships: Arc<M>,
    users: Arc<U>,
}

impl<O, M, U> OrganizationService<O, M, U> {
    /// Create a new service over the given repositories.
    pub fn new(orgs: Arc<O>, memberships: Arc<M>, users: Arc<U>) -> Self {
        Self {
            orgs,
            memberships,
            users,
        }
    }
}

impl<O, M, U> OrganizationService<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
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

    fn map_membership_error(error: MembershipRepositoryError) -> Error {
        match error {
            MembershipRepositoryError::Connection { message } => Error::service_unavailable(
                format!("membership repository unavailable: {message}"),
            ),
            MembershipRepositoryError::Query { message } => {
                Error::internal(format!("membership repository error: {message}"))
            }
            MembershipRepositoryError::DuplicatePending { .. } => {
                Error::conflict("membership request already pending")
            }
        }
    }

    async fn require_active_org(&self, org_id: &OrganizationId) -> Result<Organization, Error> {
        let organization = self
            .orgs
            .find_by_id(org_id)
            .await
            .map_err(Self::map_org_error)?
            .ok_or_else(|| Error::not_found("organization not found"))?;
        if organization.is_archived() {
            return Err(Error::not_found("organization not found"));
        }
        Ok(organization)
    }
}

#[async_trait]
impl<O, M, U> OrganizationCommand for OrganizationService<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<Organization, Error> {
        let organization = Organization::create(
            OrganizationId::random(),
            request.name,
            request.description,
            request.created_by,
            Utc::now(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.orgs
            .save(&organization)
            .await
            .map_err(Self::map_org_error)?;
        self.orgs
            .grant_admin(organization.id(), &request.created_by)
            .await
            .map_err(Self::map_org_error)?;
        Ok(organization)
    }
}

#[async_trait]
impl<O, M, U> MembershipCommand for OrganizationService<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    async fn join_organization(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
    ) -> Result<Membership, Error> {
        self.require_active_org(org_id).await?;

        if let Some(existing) = self
            .memberships
            .find(org_id, user_id)
            .await
            .map_err(Self::map_membership_error)?
        {
            match existing.status() {
                MembershipStatus::Pending => {
                    return Err(Error::conflict("membership request already pending"));
                }
                MembershipStatus::Member => {
                    return Err(Error::conflict("already a member of this organization"));
                }
                MembershipStatus::Rejected => {}
            }
        }

        let membership = Membership::request(*org_id, *user_id, Utc::now());
        self.memberships
            .insert(&membership)
            .await
            .map_err(Self::map_membership_error)?;
        Ok(membership)
    }

    async fn handle_join_request(
        &self,
        org_id: &OrganizationId,
        user_id: &UserId,
        actor: &UserId,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<Membership, Error> {
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), org_id, actor).await?;

        let mut membership = self
            .memberships
            .find(org_id, user_id)
            .await
            .map_err(Self::map_membership_error)?
            .ok_or_else(|| Error::not_found("membership request not found"))?;

        let now = Utc::now();
        match action {
            ReviewAction::Accept => membership.accept(now),
            ReviewAction::Reject => membership.reject(*actor, reason, now),
        }
        .map_err(|err| Error::conflict(err.to_string()))?;

        self.memberships
            .update(&membership)
            .await
            .map_err(Self::map_membership_error)?;
        Ok(membership)
    }
}

#[async_trait]
impl<O, M, U> PendingRequestsQuery for OrganizationService<O, M, U>
where
    O: OrganizationRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    async fn pending_requests(&self, actor: &UserId) -> Result<Vec<Membership>, Error> {
        let administered = self
            .orgs
            .administered_by(actor)
            .await
            .map_err(Self::map_org_error)?;
        if administered.is_empty() {
            return Ok(Vec::new());
        }

        // Ordered by the repository contract; no re-sort here.
        self.memberships
            .pending_for_organizations(&administered)
            .await
            .map_err(Self::map_membership_error)
    }
}
