//! Join-parent workflow domain services.
//!
//! Child-org admins file requests to attach their organization under a
//! parent; parent-org admins accept or reject them. Every precondition gets
//! its own error message so a requester can tell which rule was violated.
//! Acceptance is atomic at the repository: the status flip and the child's
//! `parent_id` land in one transaction or not at all.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::authorization::ensure_org_admin;
use crate::domain::hierarchy::descendant_ids;
use crate::domain::ports::{
    HierarchyCommand, HierarchyQuery, JoinParentRepositoryError, JoinParentRequestRepository,
    OrganizationRepository, OrganizationRepositoryError, RequestJoinParentRequest,
    UserRepository,
};
use crate::domain::{
    Error, JoinParentRequest, JoinParentRequestId, JoinParentStatus, JoinParentTransitionError,
    Organization, OrganizationId, ReviewAction, UserId,
};

/// Governance service implementing the hierarchy driving ports.
#[derive(Clone)]
pub struct HierarchyService<O, J, U> {
    orgs: Arc<O>,
    requests: Arc<J>,
    users: Arc<U>,
}

impl<O, J, U> HierarchyService<O, J, U> {
    /// Create a new service over the given repositories.
    pub fn new(orgs: Arc<O>, requests: Arc<J>, users: Arc<U>) -> Self {
        Self {
            orgs,
            requests,
            users,
        }
    }
}

impl<O, J, U> HierarchyService<O, J, U>
where
    O: OrganizationRepository,
    J: JoinParentRequestRepository,
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

    fn map_request_error(error: JoinParentRepositoryError) -> Error {
        match error {
            JoinParentRepositoryError::Connection { message } => Error::service_unavailable(
                format!("join-parent repository unavailable: {message}"),
            ),
            JoinParentRepositoryError::Query { message } => {
                Error::internal(format!("join-parent repository error: {message}"))
            }
            JoinParentRepositoryError::DuplicatePending { .. } => {
                Error::conflict("a join request is already pending for this organization")
            }
        }
    }

    fn map_transition_error(error: JoinParentTransitionError) -> Error {
        match error {
            JoinParentTransitionError::NotPending { .. } => {
                Error::conflict(error.to_string())
            }
            JoinParentTransitionError::EmptyReason => Error::invalid_request(error.to_string()),
        }
    }

    async fn require_active_org(
        &self,
        org_id: &OrganizationId,
        missing: &'static str,
    ) -> Result<Organization, Error> {
        let organization = self
            .orgs
            .find_by_id(org_id)
            .await
            .map_err(Self::map_org_error)?
            .ok_or_else(|| Error::not_found(missing))?;
        if organization.is_archived() {
            return Err(Error::not_found(missing));
        }
        Ok(organization)
    }
}

#[async_trait]
impl<O, J, U> HierarchyCommand for HierarchyService<O, J, U>
where
    O: OrganizationRepository,
    J: JoinParentRequestRepository,
    U: UserRepository,
{
    async fn request_join_parent(
        &self,
        request: RequestJoinParentRequest,
    ) -> Result<JoinParentRequest, Error> {
        let RequestJoinParentRequest {
            child_org_id,
            parent_org_id,
            actor,
            message,
        } = request;

        self.require_active_org(&child_org_id, "child organization not found")
            .await?;
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), &child_org_id, &actor).await?;

        if parent_org_id == child_org_id {
            return Err(Error::invalid_request(
                "an organization cannot join under itself",
            ));
        }

        if self
            .requests
            .pending_for_child(&child_org_id)
            .await
            .map_err(Self::map_request_error)?
            .is_some()
        {
            return Err(Error::conflict(
                "a join request is already pending for this organization",
            ));
        }

        self.require_active_org(&parent_org_id, "parent organization not found")
            .await?;

        let descendants = descendant_ids(self.orgs.as_ref(), &child_org_id).await?;
        if descendants.contains(&parent_org_id) {
            return Err(Error::invalid_request(
                "the proposed parent is a descendant of this organization",
            ));
        }

        let join_request =
            JoinParentRequest::open(child_org_id, parent_org_id, actor, message, Utc::now());
        self.requests
            .insert(&join_request)
            .await
            .map_err(Self::map_request_error)?;
        Ok(join_request)
    }

    async fn handle_request(
        &self,
        id: &JoinParentRequestId,
        actor: &UserId,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<JoinParentRequest, Error> {
        let mut join_request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(Self::map_request_error)?
            .ok_or_else(|| Error::not_found("join request not found"))?;

        let parent_org_id = *join_request.parent_org_id();
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), &parent_org_id, actor).await?;

        let now = Utc::now();
        match action {
            ReviewAction::Accept => {
                join_request
                    .accept(*actor, now)
                    .map_err(Self::map_transition_error)?;
                self.requests
                    .accept(&join_request)
                    .await
                    .map_err(Self::map_request_error)?;
            }
            ReviewAction::Reject => {
                join_request
                    .reject(*actor, reason.as_deref().unwrap_or(""), now)
                    .map_err(Self::map_transition_error)?;
                self.requests
                    .reject(&join_request)
                    .await
                    .map_err(Self::map_request_error)?;
            }
        }
        Ok(join_request)
    }

    async fn cancel_request(
        &self,
        id: &JoinParentRequestId,
        actor: &UserId,
    ) -> Result<(), Error> {
        let join_request = self
            .requests
            .find_by_id(id)
            .await
            .map_err(Self::map_request_error)?
            .ok_or_else(|| Error::not_found("join request not found"))?;

        let child_org_id = *join_request.child_org_id();
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), &child_org_id, actor).await?;

        if join_request.status() != JoinParentStatus::Pending {
            return Err(Error::conflict("join request is no longer pending"));
        }

        self.requests
            .delete(id)
            .await
            .map_err(Self::map_request_error)
    }
}

#[async_trait]
impl<O, J, U> HierarchyQuery for HierarchyService<O, J, U>
where
    O: OrganizationRepository,
    J: JoinParentRequestRepository,
    U: UserRepository,
{
    async fn incoming_requests(
        &self,
        parent_org_id: &OrganizationId,
        actor: &UserId,
    ) -> Result<Vec<JoinParentRequest>, Error> {
        self.require_active_org(parent_org_id, "organization not found")
            .await?;
        ensure_org_admin(self.orgs.as_ref(), self.users.as_ref(), parent_org_id, actor).await?;

        self.requests
            .incoming_pending(parent_org_id)
            .await
            .map_err(Self::map_request_error)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::ports::{
        MockJoinParentRequestRepository, MockOrganizationRepository, MockUserRepository,
    };
    use crate::domain::ErrorCode;

    fn make_service(
        orgs: MockOrganizationRepository,
        requests: MockJoinParentRequestRepository,
        users: MockUserRepository,
    ) -> HierarchyService<
        MockOrganizationRepository,
        MockJoinParentRequestRepository,
        MockUserRepository,
    > {
        HierarchyService::new(Arc::new(orgs), Arc::new(requests), Arc::new(users))
    }

    fn active_org(id: OrganizationId) -> Organization {
        Organization::from_parts(
            id,
            "node".to_owned(),
            None,
            None,
            UserId::random(),
            Utc::now(),
            None,
        )
    }

    fn join_request(
        child: OrganizationId,
        parent: OrganizationId,
        actor: UserId,
    ) -> RequestJoinParentRequest {
        RequestJoinParentRequest {
            child_org_id: child,
            parent_org_id: parent,
            actor,
            message: None,
        }
    }

    #[tokio::test]
    async fn self_parenting_is_rejected_before_any_request_lookup() {
        let child = OrganizationId::random();
        let actor = UserId::random();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(active_org(*id))));
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        let mut requests = MockJoinParentRequestRepository::new();
        requests.expect_pending_for_child().times(0);
        requests.expect_insert().times(0);

        let service = make_service(orgs, requests, MockUserRepository::new());
        let err = service
            .request_join_parent(join_request(child, child, actor))
            .await
            .expect_err("self-parenting must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn a_descendant_cannot_become_the_parent() {
        // Chain A -> B -> C; A asking to join under C would close a cycle.
        let a = OrganizationId::random();
        let b = OrganizationId::random();
        let c = OrganizationId::random();
        let actor = UserId::random();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .times(3)
            .returning(move |id| Ok(Some(active_org(*id))));
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        orgs.expect_children_of()
            .with(eq(a))
            .return_once(move |_| Ok(vec![b]));
        orgs.expect_children_of()
            .with(eq(b))
            .return_once(move |_| Ok(vec![c]));
        orgs.expect_children_of()
            .with(eq(c))
            .return_once(|_| Ok(Vec::new()));

        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_pending_for_child()
            .times(1)
            .return_once(|_| Ok(None));
        requests.expect_insert().times(0);

        let service = make_service(orgs, requests, MockUserRepository::new());
        let err = service
            .request_join_parent(join_request(a, c, actor))
            .await
            .expect_err("cycle-closing request must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn a_pending_request_blocks_a_second_one() {
        let child = OrganizationId::random();
        let parent = OrganizationId::random();
        let actor = UserId::random();
        let pending = JoinParentRequest::open(child, parent, actor, None, Utc::now());

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(active_org(*id))));
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_pending_for_child()
            .times(1)
            .return_once(move |_| Ok(Some(pending)));
        requests.expect_insert().times(0);

        let service = make_service(orgs, requests, MockUserRepository::new());
        let err = service
            .request_join_parent(join_request(child, parent, actor))
            .await
            .expect_err("second pending request must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn a_valid_request_is_filed_as_pending() {
        let child = OrganizationId::random();
        let parent = OrganizationId::random();
        let actor = UserId::random();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .times(3)
            .returning(move |id| Ok(Some(active_org(*id))));
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        orgs.expect_children_of().returning(|_| Ok(Vec::new()));
        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_pending_for_child()
            .times(1)
            .return_once(|_| Ok(None));
        requests.expect_insert().times(1).return_once(|_| Ok(()));

        let service = make_service(orgs, requests, MockUserRepository::new());
        let filed = service
            .request_join_parent(join_request(child, parent, actor))
            .await
            .expect("request succeeds");
        assert_eq!(filed.status(), JoinParentStatus::Pending);
        assert_eq!(filed.child_org_id(), &child);
        assert_eq!(filed.parent_org_id(), &parent);
    }

    #[tokio::test]
    async fn accepting_goes_through_the_atomic_repository_call() {
        let child = OrganizationId::random();
        let parent = OrganizationId::random();
        let admin = UserId::random();
        let pending = JoinParentRequest::open(child, parent, UserId::random(), None, Utc::now());
        let id = *pending.id();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin()
            .withf(move |org, _| org == &parent)
            .times(1)
            .return_once(|_, _| Ok(true));
        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(pending)));
        requests
            .expect_accept()
            .withf(|r: &JoinParentRequest| r.status() == JoinParentStatus::Accepted)
            .times(1)
            .return_once(|_| Ok(()));
        requests.expect_reject().times(0);

        let service = make_service(orgs, requests, MockUserRepository::new());
        let resolved = service
            .handle_request(&id, &admin, ReviewAction::Accept, None)
            .await
            .expect("accept succeeds");
        assert_eq!(resolved.status(), JoinParentStatus::Accepted);
        assert_eq!(resolved.resolved_by(), Some(&admin));
    }

    #[tokio::test]
    async fn rejecting_without_a_reason_is_invalid() {
        let pending = JoinParentRequest::open(
            OrganizationId::random(),
            OrganizationId::random(),
            UserId::random(),
            None,
            Utc::now(),
        );
        let id = *pending.id();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(true));
        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(pending)));
        requests.expect_reject().times(0);

        let service = make_service(orgs, requests, MockUserRepository::new());
        let err = service
            .handle_request(&id, &UserId::random(), ReviewAction::Reject, None)
            .await
            .expect_err("missing reason must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn cancelling_deletes_the_pending_row() {
        let child = OrganizationId::random();
        let pending = JoinParentRequest::open(
            child,
            OrganizationId::random(),
            UserId::random(),
            None,
            Utc::now(),
        );
        let id = *pending.id();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_is_admin()
            .withf(move |org, _| org == &child)
            .times(1)
            .return_once(|_, _| Ok(true));
        let mut requests = MockJoinParentRequestRepository::new();
        requests
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(pending)));
        requests
            .expect_delete()
            .with(eq(id))
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(orgs, requests, MockUserRepository::new());
        service
            .cancel_request(&id, &UserId::random())
            .await
            .expect("cancel succeeds");
    }

    #[tokio::test]
    async fn incoming_requires_the_parent_admin_role() {
        let parent = OrganizationId::random();

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(active_org(*id))));
        orgs.expect_is_admin().times(1).return_once(|_, _| Ok(false));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let mut requests = MockJoinParentRequestRepository::new();
        requests.expect_incoming_pending().times(0);

        let service = make_service(orgs, requests, users);
        let err = service
            .incoming_requests(&parent, &UserId::random())
            .await
            .expect_err("non-admin must be rejected");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
