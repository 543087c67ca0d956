//! Board management and vote-draft flows over in-memory adapters.

use std::collections::BTreeMap;
use std::sync::Arc;

use backend::domain::ports::{
    BoardCommand, BoardQuery, CreateBoardRequest, OrganizationRepository, PollRepository,
    SaveDraftRequest, VotingCommand,
};
use backend::domain::{
    Answer, AnswerId, BoardId, BoardService, ErrorCode, Organization, OrganizationId, Participant,
    Poll, PollId, PollPage, Question, QuestionId, QuestionType, UserId, VotingService,
};
use backend::test_support::memory::{
    InMemoryBoardRepository, InMemoryOrganizationRepository, InMemoryPollRepository,
    InMemoryUserRepository, InMemoryVoteDraftRepository,
};
use chrono::Utc;

type MemoryBoardService = BoardService<
    InMemoryOrganizationRepository,
    InMemoryBoardRepository,
    InMemoryUserRepository,
>;

fn board_harness() -> (Arc<InMemoryOrganizationRepository>, MemoryBoardService) {
    let orgs = Arc::new(InMemoryOrganizationRepository::default());
    let boards = Arc::new(InMemoryBoardRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let service = BoardService::new(orgs.clone(), boards, users);
    (orgs, service)
}

async fn seed_org(
    orgs: &InMemoryOrganizationRepository,
    admin: &UserId,
) -> Organization {
    let org = Organization::create(
        OrganizationId::random(),
        "Allotment".to_owned(),
        None,
        *admin,
        Utc::now(),
    )
    .expect("valid organization");
    orgs.save(&org).await.expect("seed organization");
    orgs.grant_admin(org.id(), admin).await.expect("seed admin");
    org
}

fn board_request(org: &Organization, actor: &UserId, name: &str) -> CreateBoardRequest {
    CreateBoardRequest {
        organization_id: *org.id(),
        name: name.to_owned(),
        general: false,
        actor: *actor,
    }
}

#[tokio::test]
async fn admins_create_list_and_archive_boards() {
    let (orgs, service) = board_harness();
    let admin = UserId::random();
    let org = seed_org(&orgs, &admin).await;

    let general = service
        .create_board(CreateBoardRequest {
            organization_id: *org.id(),
            name: "General".to_owned(),
            general: true,
            actor: admin,
        })
        .await
        .expect("general board is created");
    assert!(general.is_general());

    let projects = service
        .create_board(board_request(&org, &admin, "Projects"))
        .await
        .expect("second board is created");

    let archived = service
        .archive_board(projects.id(), &admin)
        .await
        .expect("admin archives the board");
    assert!(archived.is_archived());

    // Archived boards stay listed, in creation order.
    let listed = service
        .list_boards(org.id(), &admin)
        .await
        .expect("admin lists boards");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), general.id());
    assert_eq!(listed[1].id(), projects.id());
    assert!(listed[1].is_archived());

    let err = service
        .archive_board(projects.id(), &admin)
        .await
        .expect_err("archiving twice is rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn non_admins_cannot_touch_boards() {
    let (orgs, service) = board_harness();
    let admin = UserId::random();
    let org = seed_org(&orgs, &admin).await;
    let stranger = UserId::random();

    let err = service
        .create_board(board_request(&org, &stranger, "Projects"))
        .await
        .expect_err("strangers cannot create boards");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = service
        .list_boards(org.id(), &stranger)
        .await
        .expect_err("strangers cannot list boards");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

fn two_question_poll(
    single: QuestionId,
    multi: QuestionId,
    answers: &[AnswerId; 3],
) -> Poll {
    let answer = |id: &AnswerId| Answer {
        id: *id,
        text: "option".to_owned(),
    };
    Poll::new(
        PollId::random(),
        BoardId::random(),
        "Season planning",
        vec![PollPage {
            questions: vec![
                Question {
                    id: single,
                    text: "Approve the budget?".to_owned(),
                    kind: QuestionType::SingleChoice,
                    answers: vec![answer(&answers[0]), answer(&answers[1])],
                },
                Question {
                    id: multi,
                    text: "Which plots?".to_owned(),
                    kind: QuestionType::MultipleChoice,
                    answers: vec![answer(&answers[1]), answer(&answers[2])],
                },
            ],
        }],
        Utc::now(),
    )
}

struct VotingHarness {
    service: VotingService<InMemoryPollRepository, InMemoryVoteDraftRepository>,
    poll: Poll,
    voter: UserId,
    single: QuestionId,
    multi: QuestionId,
    answers: [AnswerId; 3],
}

async fn voting_harness() -> VotingHarness {
    let polls = Arc::new(InMemoryPollRepository::default());
    let drafts = Arc::new(InMemoryVoteDraftRepository::default());
    let service = VotingService::new(polls.clone(), drafts);

    let single = QuestionId::random();
    let multi = QuestionId::random();
    let answers = [AnswerId::random(), AnswerId::random(), AnswerId::random()];
    let poll = two_question_poll(single, multi, &answers);
    polls.save(&poll).await.expect("seed poll");

    let voter = UserId::random();
    polls.enroll(Participant {
        poll_id: *poll.id(),
        user_id: voter,
        weight: 3,
    });

    VotingHarness {
        service,
        poll,
        voter,
        single,
        multi,
        answers,
    }
}

fn selections(
    pairs: &[(QuestionId, Vec<AnswerId>)],
) -> BTreeMap<QuestionId, Vec<AnswerId>> {
    pairs.iter().cloned().collect()
}

#[tokio::test]
async fn drafts_save_replace_and_finish() {
    let h = voting_harness().await;

    let draft = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[
                (h.single, vec![h.answers[0]]),
                (h.multi, vec![h.answers[1], h.answers[2]]),
            ]),
        })
        .await
        .expect("draft saves");
    assert_eq!(draft.selections().len(), 2);

    // A later save replaces the whole selection set.
    let replaced = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[(h.single, vec![h.answers[1]])]),
        })
        .await
        .expect("second save replaces the first");
    assert_eq!(replaced.selections().len(), 1);
    assert_eq!(
        replaced.selections().get(&h.single),
        Some(&vec![h.answers[1]])
    );

    let finished = h
        .service
        .finish_draft(h.poll.id(), &h.voter)
        .await
        .expect("draft finishes");
    assert!(finished.is_finished());

    // A finished draft is immutable.
    let err = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[(h.single, vec![h.answers[0]])]),
        })
        .await
        .expect_err("finished drafts reject saves");
    assert_eq!(err.code(), ErrorCode::Conflict);

    let err = h
        .service
        .finish_draft(h.poll.id(), &h.voter)
        .await
        .expect_err("finishing twice is rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn only_enrolled_participants_may_draft() {
    let h = voting_harness().await;
    let outsider = UserId::random();

    let err = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: outsider,
            selections: BTreeMap::new(),
        })
        .await
        .expect_err("non-participants are rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn selections_are_validated_against_the_poll() {
    let h = voting_harness().await;

    let err = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[(QuestionId::random(), vec![h.answers[0]])]),
        })
        .await
        .expect_err("unknown questions are rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let err = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[(h.single, vec![h.answers[2]])]),
        })
        .await
        .expect_err("answers from another question are rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);

    let err = h
        .service
        .save_draft(SaveDraftRequest {
            poll_id: *h.poll.id(),
            user_id: h.voter,
            selections: selections(&[(h.single, vec![h.answers[0], h.answers[1]])]),
        })
        .await
        .expect_err("single-choice questions take one answer");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn finishing_without_a_draft_is_not_found() {
    let h = voting_harness().await;

    let err = h
        .service
        .finish_draft(h.poll.id(), &h.voter)
        .await
        .expect_err("nothing to finish");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
