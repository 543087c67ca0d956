//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_use_cases;
mod board_repository;
mod board_use_cases;
mod hierarchy_use_cases;
mod join_parent_repository;
mod membership_repository;
mod organization_repository;
mod organization_use_cases;
mod password;
mod poll_repository;
mod session_repository;
mod user_repository;
mod vote_draft_repository;
mod voting_use_cases;

#[cfg(test)]
pub use auth_use_cases::{
    MockLoginUser, MockLogoutUser, MockRegisterUser, MockSessionAuthenticator,
};
pub use auth_use_cases::{
    FixtureLoginUser, FixtureLogoutUser, FixtureRegisterUser, FixtureSessionAuthenticator,
    LoginUser, LogoutUser, RegisterUser, RegisterUserRequest, SessionAuthenticator,
};
#[cfg(test)]
pub use board_repository::MockBoardRepository;
pub use board_repository::{BoardRepository, BoardRepositoryError, FixtureBoardRepository};
#[cfg(test)]
pub use board_use_cases::{MockBoardCommand, MockBoardQuery};
pub use board_use_cases::{
    BoardCommand, BoardQuery, CreateBoardRequest, FixtureBoardCommand, FixtureBoardQuery,
};
#[cfg(test)]
pub use hierarchy_use_cases::{MockHierarchyCommand, MockHierarchyQuery};
pub use hierarchy_use_cases::{
    FixtureHierarchyCommand, FixtureHierarchyQuery, HierarchyCommand, HierarchyQuery,
    RequestJoinParentRequest,
};
#[cfg(test)]
pub use join_parent_repository::MockJoinParentRequestRepository;
pub use join_parent_repository::{
    FixtureJoinParentRequestRepository, JoinParentRepositoryError, JoinParentRequestRepository,
};
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{
    FixtureMembershipRepository, MembershipRepository, MembershipRepositoryError,
};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{
    FixtureOrganizationRepository, OrganizationRepository, OrganizationRepositoryError,
};
#[cfg(test)]
pub use organization_use_cases::{
    MockMembershipCommand, MockOrganizationCommand, MockPendingRequestsQuery,
};
pub use organization_use_cases::{
    CreateOrganizationRequest, FixtureMembershipCommand, FixtureOrganizationCommand,
    FixturePendingRequestsQuery,
    MembershipCommand, OrganizationCommand, PendingRequestsQuery,
};
#[cfg(test)]
pub use password::{MockPasswordHasher, MockPasswordVerifier};
pub use password::{FixturePasswordHasher, PasswordHashError, PasswordHasher, PasswordVerifier};
#[cfg(test)]
pub use poll_repository::MockPollRepository;
pub use poll_repository::{FixturePollRepository, PollRepository, PollRepositoryError};
#[cfg(test)]
pub use session_repository::MockSessionRepository;
pub use session_repository::{
    FixtureSessionRepository, SessionRepository, SessionRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use vote_draft_repository::MockVoteDraftRepository;
pub use vote_draft_repository::{
    FixtureVoteDraftRepository, VoteDraftRepository, VoteDraftRepositoryError,
};
#[cfg(test)]
pub use voting_use_cases::MockVotingCommand;
pub use voting_use_cases::{FixtureVotingCommand, SaveDraftRequest, VotingCommand};
