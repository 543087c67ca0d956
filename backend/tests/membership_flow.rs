//! Membership join-request lifecycle over in-memory adapters.
//!
//! Covers requesting to join, admin review, re-requesting after a rejection,
//! and the admin pending queue ordering across organizations.

use std::sync::Arc;

use backend::domain::ports::{
    CreateOrganizationRequest, MembershipCommand, MembershipRepository, OrganizationCommand,
    OrganizationRepository, PendingRequestsQuery, UserRepository,
};
use backend::domain::{
    ErrorCode, Language, Membership, MembershipStatus, Organization, OrganizationService,
    PasswordHash, PhoneNumber, ReviewAction, User, UserId,
};
use backend::test_support::memory::{
    InMemoryMembershipRepository, InMemoryOrganizationRepository, InMemoryUserRepository,
};
use chrono::{Duration, Utc};

struct Harness {
    orgs: Arc<InMemoryOrganizationRepository>,
    users: Arc<InMemoryUserRepository>,
    memberships: Arc<InMemoryMembershipRepository>,
    service: OrganizationService<
        InMemoryOrganizationRepository,
        InMemoryMembershipRepository,
        InMemoryUserRepository,
    >,
}

fn harness() -> Harness {
    let orgs = Arc::new(InMemoryOrganizationRepository::default());
    let memberships = Arc::new(InMemoryMembershipRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let service = OrganizationService::new(orgs.clone(), memberships.clone(), users.clone());
    Harness {
        orgs,
        users,
        memberships,
        service,
    }
}

fn user(suffix: u32, superadmin: bool) -> User {
    User::from_parts(
        UserId::random(),
        "Grace".to_owned(),
        None,
        PhoneNumber::new(format!("+4420755512{suffix:02}")).expect("valid phone"),
        PasswordHash::new("hashed"),
        Language::En,
        superadmin,
        Utc::now(),
    )
}

async fn seed_org(harness: &Harness, admin: &UserId, name: &str) -> Organization {
    harness
        .service
        .create_organization(CreateOrganizationRequest {
            name: name.to_owned(),
            description: None,
            created_by: *admin,
        })
        .await
        .expect("organization is created")
}

#[tokio::test]
async fn join_approve_makes_a_member() {
    let harness = harness();
    let admin = UserId::random();
    let org = seed_org(&harness, &admin, "Allotment").await;
    let applicant = UserId::random();

    let membership = harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect("join request opens");
    assert_eq!(membership.status(), MembershipStatus::Pending);

    let reviewed = harness
        .service
        .handle_join_request(org.id(), &applicant, &admin, ReviewAction::Accept, None)
        .await
        .expect("admin approves");
    assert_eq!(reviewed.status(), MembershipStatus::Member);
    assert!(reviewed.joined_at().is_some());

    // A member cannot open another request.
    let err = harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect_err("members cannot re-apply");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn a_second_pending_request_conflicts() {
    let harness = harness();
    let admin = UserId::random();
    let org = seed_org(&harness, &admin, "Allotment").await;
    let applicant = UserId::random();

    harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect("first request opens");
    let err = harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect_err("second request while pending is rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn rejection_records_the_reason_and_allows_a_retry() {
    let harness = harness();
    let admin = UserId::random();
    let org = seed_org(&harness, &admin, "Allotment").await;
    let applicant = UserId::random();

    harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect("request opens");
    let rejected = harness
        .service
        .handle_join_request(
            org.id(),
            &applicant,
            &admin,
            ReviewAction::Reject,
            Some("incomplete application".to_owned()),
        )
        .await
        .expect("admin rejects");
    assert_eq!(rejected.status(), MembershipStatus::Rejected);
    assert_eq!(rejected.rejection_reason(), Some("incomplete application"));
    assert_eq!(rejected.rejected_by(), Some(&admin));

    // The settled rejection does not block a fresh request.
    let retried = harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect("rejected user may re-apply");
    assert_eq!(retried.status(), MembershipStatus::Pending);
}

#[tokio::test]
async fn only_admins_or_superadmins_review_requests() {
    let harness = harness();
    let admin = UserId::random();
    let org = seed_org(&harness, &admin, "Allotment").await;
    let applicant = UserId::random();
    harness
        .service
        .join_organization(org.id(), &applicant)
        .await
        .expect("request opens");

    let bystander = user(1, false);
    harness.users.save(&bystander).await.expect("seed user");
    let err = harness
        .service
        .handle_join_request(
            org.id(),
            &applicant,
            bystander.id(),
            ReviewAction::Accept,
            None,
        )
        .await
        .expect_err("non-admins cannot review");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let root = user(2, true);
    harness.users.save(&root).await.expect("seed superadmin");
    let reviewed = harness
        .service
        .handle_join_request(org.id(), &applicant, root.id(), ReviewAction::Accept, None)
        .await
        .expect("superadmin may review any organization");
    assert_eq!(reviewed.status(), MembershipStatus::Member);
}

#[tokio::test]
async fn pending_queue_is_oldest_first_across_administered_organizations() {
    let harness = harness();
    let admin = UserId::random();
    let first_org = seed_org(&harness, &admin, "First").await;
    let second_org = seed_org(&harness, &admin, "Second").await;

    // Three requests with distinct timestamps, inserted out of order.
    let now = Utc::now();
    let oldest = Membership::request(*second_org.id(), UserId::random(), now - Duration::hours(3));
    let middle = Membership::request(*first_org.id(), UserId::random(), now - Duration::hours(2));
    let newest = Membership::request(*second_org.id(), UserId::random(), now - Duration::hours(1));
    harness.memberships.insert(&newest).await.expect("seed");
    harness.memberships.insert(&oldest).await.expect("seed");
    harness.memberships.insert(&middle).await.expect("seed");

    let queue = harness
        .service
        .pending_requests(&admin)
        .await
        .expect("queue resolves");
    assert_eq!(queue.len(), 3);
    assert_eq!(queue[0].user_id(), oldest.user_id());
    assert_eq!(queue[1].user_id(), middle.user_id());
    assert_eq!(queue[2].user_id(), newest.user_id());

    // Settled requests leave the queue; the rest keep their order.
    harness
        .service
        .handle_join_request(
            second_org.id(),
            oldest.user_id(),
            &admin,
            ReviewAction::Accept,
            None,
        )
        .await
        .expect("review succeeds");
    let queue = harness
        .service
        .pending_requests(&admin)
        .await
        .expect("queue resolves");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].user_id(), middle.user_id());
    assert_eq!(queue[1].user_id(), newest.user_id());
}

#[tokio::test]
async fn archived_organizations_do_not_accept_requests() {
    let harness = harness();
    let admin = UserId::random();
    let org = seed_org(&harness, &admin, "Allotment").await;

    let mut archived = org.clone();
    archived.archive(Utc::now()).expect("archive succeeds");
    harness.orgs.save(&archived).await.expect("seed");

    let err = harness
        .service
        .join_organization(org.id(), &UserId::random())
        .await
        .expect_err("archived organizations are invisible");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
