//! Test utilities for the backend crate.
//!
//! Shared in-memory adapters for both unit tests (in `src/`) and integration
//! tests (in `tests/`). The adapters honour the repository port contracts,
//! including pending-queue ordering and the duplicate-pending constraints
//! that the database enforces with partial unique indexes.

pub mod memory {
    //! In-memory repository adapters over `Mutex`-guarded collections.

    use std::collections::HashMap;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex, MutexGuard};

    use async_trait::async_trait;

    use crate::domain::ports::{
        BoardRepository, BoardRepositoryError, JoinParentRepositoryError,
        JoinParentRequestRepository, MembershipRepository, MembershipRepositoryError,
        OrganizationRepository, OrganizationRepositoryError, PollRepository, PollRepositoryError,
        SessionRepository, SessionRepositoryError, UserRepository, UserPersistenceError,
        VoteDraftRepository, VoteDraftRepositoryError,
    };
    use crate::domain::{
        Board, BoardId, JoinParentRequest, JoinParentRequestId, JoinParentStatus, Membership,
        MembershipStatus, Organization, OrganizationId, Participant, PhoneNumber, Poll, PollId,
        Session, SessionId, User, UserId, VoteDraft,
    };

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().expect("mutex poisoned in test adapter")
    }

    /// Users keyed by id, with the phone uniqueness constraint enforced.
    #[derive(Debug, Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<HashMap<UserId, User>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_phone(
            &self,
            phone: &PhoneNumber,
        ) -> Result<Option<User>, UserPersistenceError> {
            Ok(lock(&self.users)
                .values()
                .find(|user| user.phone() == phone)
                .cloned())
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
            Ok(lock(&self.users).get(id).cloned())
        }

        async fn exists(&self, phone: &PhoneNumber) -> Result<bool, UserPersistenceError> {
            Ok(lock(&self.users).values().any(|user| user.phone() == phone))
        }

        async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
            let mut users = lock(&self.users);
            let taken = users
                .values()
                .any(|existing| existing.phone() == user.phone() && existing.id() != user.id());
            if taken {
                return Err(UserPersistenceError::duplicate_phone(
                    user.phone().as_ref().to_owned(),
                ));
            }
            users.insert(*user.id(), user.clone());
            Ok(())
        }
    }

    /// Sessions keyed by their opaque id.
    #[derive(Debug, Default)]
    pub struct InMemorySessionRepository {
        sessions: Mutex<HashMap<SessionId, Session>>,
    }

    #[async_trait]
    impl SessionRepository for InMemorySessionRepository {
        async fn save(&self, session: &Session) -> Result<(), SessionRepositoryError> {
            lock(&self.sessions).insert(*session.id(), session.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: &SessionId,
        ) -> Result<Option<Session>, SessionRepositoryError> {
            Ok(lock(&self.sessions).get(id).cloned())
        }

        async fn delete(&self, id: &SessionId) -> Result<(), SessionRepositoryError> {
            lock(&self.sessions).remove(id);
            Ok(())
        }

        async fn delete_all_for_user(
            &self,
            user_id: &UserId,
        ) -> Result<(), SessionRepositoryError> {
            lock(&self.sessions).retain(|_, session| session.user_id() != user_id);
            Ok(())
        }
    }

    /// Organization tree plus admin role assignments.
    #[derive(Debug, Default)]
    pub struct InMemoryOrganizationRepository {
        organizations: Mutex<HashMap<OrganizationId, Organization>>,
        admins: Mutex<HashSet<(OrganizationId, UserId)>>,
    }

    #[async_trait]
    impl OrganizationRepository for InMemoryOrganizationRepository {
        async fn find_by_id(
            &self,
            id: &OrganizationId,
        ) -> Result<Option<Organization>, OrganizationRepositoryError> {
            Ok(lock(&self.organizations).get(id).cloned())
        }

        async fn save(
            &self,
            organization: &Organization,
        ) -> Result<(), OrganizationRepositoryError> {
            lock(&self.organizations).insert(*organization.id(), organization.clone());
            Ok(())
        }

        async fn children_of(
            &self,
            id: &OrganizationId,
        ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
            Ok(lock(&self.organizations)
                .values()
                .filter(|org| org.parent_id() == Some(id) && !org.is_archived())
                .map(|org| *org.id())
                .collect())
        }

        async fn is_admin(
            &self,
            org_id: &OrganizationId,
            user_id: &UserId,
        ) -> Result<bool, OrganizationRepositoryError> {
            Ok(lock(&self.admins).contains(&(*org_id, *user_id)))
        }

        async fn grant_admin(
            &self,
            org_id: &OrganizationId,
            user_id: &UserId,
        ) -> Result<(), OrganizationRepositoryError> {
            lock(&self.admins).insert((*org_id, *user_id));
            Ok(())
        }

        async fn administered_by(
            &self,
            user_id: &UserId,
        ) -> Result<Vec<OrganizationId>, OrganizationRepositoryError> {
            Ok(lock(&self.admins)
                .iter()
                .filter(|(_, admin)| admin == user_id)
                .map(|(org, _)| *org)
                .collect())
        }
    }

    /// Membership history rows with the at-most-one-pending constraint.
    #[derive(Debug, Default)]
    pub struct InMemoryMembershipRepository {
        rows: Mutex<Vec<Membership>>,
    }

    #[async_trait]
    impl MembershipRepository for InMemoryMembershipRepository {
        async fn find(
            &self,
            org_id: &OrganizationId,
            user_id: &UserId,
        ) -> Result<Option<Membership>, MembershipRepositoryError> {
            Ok(lock(&self.rows)
                .iter()
                .filter(|row| row.organization_id() == org_id && row.user_id() == user_id)
                .max_by_key(|row| row.requested_at())
                .cloned())
        }

        async fn insert(&self, membership: &Membership) -> Result<(), MembershipRepositoryError> {
            let mut rows = lock(&self.rows);
            let pending = rows.iter().any(|row| {
                row.organization_id() == membership.organization_id()
                    && row.user_id() == membership.user_id()
                    && row.status() == MembershipStatus::Pending
            });
            if pending {
                return Err(MembershipRepositoryError::duplicate_pending(
                    "a pending request already exists",
                ));
            }
            rows.push(membership.clone());
            Ok(())
        }

        async fn update(&self, membership: &Membership) -> Result<(), MembershipRepositoryError> {
            let mut rows = lock(&self.rows);
            let slot = rows.iter_mut().find(|row| {
                row.organization_id() == membership.organization_id()
                    && row.user_id() == membership.user_id()
                    && row.status() == MembershipStatus::Pending
            });
            match slot {
                Some(row) => {
                    *row = membership.clone();
                    Ok(())
                }
                None => Err(MembershipRepositoryError::query(
                    "no pending membership row to update",
                )),
            }
        }

        async fn pending_for_organizations(
            &self,
            org_ids: &[OrganizationId],
        ) -> Result<Vec<Membership>, MembershipRepositoryError> {
            let mut pending: Vec<Membership> = lock(&self.rows)
                .iter()
                .filter(|row| {
                    row.status() == MembershipStatus::Pending
                        && org_ids.contains(row.organization_id())
                })
                .cloned()
                .collect();
            pending.sort_by_key(Membership::requested_at);
            Ok(pending)
        }
    }

    /// Join-parent requests, with acceptance applying the parent link to the
    /// shared organization store the way the database transaction does.
    #[derive(Debug)]
    pub struct InMemoryJoinParentRepository {
        requests: Mutex<HashMap<JoinParentRequestId, JoinParentRequest>>,
        organizations: Arc<InMemoryOrganizationRepository>,
    }

    impl InMemoryJoinParentRepository {
        /// Bind the repository to the organization store that acceptances
        /// mutate.
        #[must_use]
        pub fn new(organizations: Arc<InMemoryOrganizationRepository>) -> Self {
            Self {
                requests: Mutex::new(HashMap::new()),
                organizations,
            }
        }
    }

    #[async_trait]
    impl JoinParentRequestRepository for InMemoryJoinParentRepository {
        async fn find_by_id(
            &self,
            id: &JoinParentRequestId,
        ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
            Ok(lock(&self.requests).get(id).cloned())
        }

        async fn pending_for_child(
            &self,
            child: &OrganizationId,
        ) -> Result<Option<JoinParentRequest>, JoinParentRepositoryError> {
            Ok(lock(&self.requests)
                .values()
                .find(|request| {
                    request.child_org_id() == child
                        && request.status() == JoinParentStatus::Pending
                })
                .cloned())
        }

        async fn incoming_pending(
            &self,
            parent: &OrganizationId,
        ) -> Result<Vec<JoinParentRequest>, JoinParentRepositoryError> {
            let mut incoming: Vec<JoinParentRequest> = lock(&self.requests)
                .values()
                .filter(|request| {
                    request.parent_org_id() == parent
                        && request.status() == JoinParentStatus::Pending
                })
                .cloned()
                .collect();
            incoming.sort_by_key(JoinParentRequest::created_at);
            Ok(incoming)
        }

        async fn insert(
            &self,
            request: &JoinParentRequest,
        ) -> Result<(), JoinParentRepositoryError> {
            let mut requests = lock(&self.requests);
            let pending = requests.values().any(|existing| {
                existing.child_org_id() == request.child_org_id()
                    && existing.status() == JoinParentStatus::Pending
            });
            if pending {
                return Err(JoinParentRepositoryError::duplicate_pending(
                    "a pending request already exists for this organization",
                ));
            }
            requests.insert(*request.id(), request.clone());
            Ok(())
        }

        async fn accept(
            &self,
            request: &JoinParentRequest,
        ) -> Result<(), JoinParentRepositoryError> {
            // Both guards stay held so the status flip and the parent
            // pointer land together, mirroring the port's atomicity
            // contract.
            let mut organizations = lock(&self.organizations.organizations);
            let mut requests = lock(&self.requests);
            let child = organizations.get_mut(request.child_org_id()).ok_or_else(|| {
                JoinParentRepositoryError::query("child organization missing")
            })?;
            child.attach_to_parent(*request.parent_org_id());
            requests.insert(*request.id(), request.clone());
            Ok(())
        }

        async fn reject(
            &self,
            request: &JoinParentRequest,
        ) -> Result<(), JoinParentRepositoryError> {
            lock(&self.requests).insert(*request.id(), request.clone());
            Ok(())
        }

        async fn delete(&self, id: &JoinParentRequestId) -> Result<(), JoinParentRepositoryError> {
            lock(&self.requests).remove(id);
            Ok(())
        }
    }

    /// Boards keyed by id.
    #[derive(Debug, Default)]
    pub struct InMemoryBoardRepository {
        boards: Mutex<HashMap<BoardId, Board>>,
    }

    #[async_trait]
    impl BoardRepository for InMemoryBoardRepository {
        async fn save(&self, board: &Board) -> Result<(), BoardRepositoryError> {
            lock(&self.boards).insert(*board.id(), board.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &BoardId) -> Result<Option<Board>, BoardRepositoryError> {
            Ok(lock(&self.boards).get(id).cloned())
        }

        async fn list_for_organization(
            &self,
            org_id: &OrganizationId,
        ) -> Result<Vec<Board>, BoardRepositoryError> {
            let mut boards: Vec<Board> = lock(&self.boards)
                .values()
                .filter(|board| board.organization_id() == org_id)
                .cloned()
                .collect();
            boards.sort_by_key(Board::created_at);
            Ok(boards)
        }
    }

    /// Polls and their participant enrolments.
    #[derive(Debug, Default)]
    pub struct InMemoryPollRepository {
        polls: Mutex<HashMap<PollId, Poll>>,
        participants: Mutex<Vec<Participant>>,
    }

    impl InMemoryPollRepository {
        /// Enrol a participant with a voting weight snapshot.
        pub fn enroll(&self, participant: Participant) {
            lock(&self.participants).push(participant);
        }
    }

    #[async_trait]
    impl PollRepository for InMemoryPollRepository {
        async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, PollRepositoryError> {
            Ok(lock(&self.polls).get(id).cloned())
        }

        async fn save(&self, poll: &Poll) -> Result<(), PollRepositoryError> {
            lock(&self.polls).insert(*poll.id(), poll.clone());
            Ok(())
        }

        async fn find_participant(
            &self,
            poll_id: &PollId,
            user_id: &UserId,
        ) -> Result<Option<Participant>, PollRepositoryError> {
            Ok(lock(&self.participants)
                .iter()
                .find(|p| &p.poll_id == poll_id && &p.user_id == user_id)
                .cloned())
        }
    }

    /// Vote drafts keyed by `(poll, user)`.
    #[derive(Debug, Default)]
    pub struct InMemoryVoteDraftRepository {
        drafts: Mutex<HashMap<(PollId, UserId), VoteDraft>>,
    }

    #[async_trait]
    impl VoteDraftRepository for InMemoryVoteDraftRepository {
        async fn find(
            &self,
            poll_id: &PollId,
            user_id: &UserId,
        ) -> Result<Option<VoteDraft>, VoteDraftRepositoryError> {
            Ok(lock(&self.drafts)
                .get(&(*poll_id, *user_id))
                .cloned())
        }

        async fn upsert(&self, draft: &VoteDraft) -> Result<(), VoteDraftRepositoryError> {
            lock(&self.drafts).insert(
                (*draft.poll_id(), *draft.user_id()),
                draft.clone(),
            );
            Ok(())
        }
    }
}
