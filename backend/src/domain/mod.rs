//! Domain entities, value objects, and services.
//!
//! Purpose: model the governance domain (users, organizations, memberships,
//! the organization hierarchy, boards, polls, and vote drafts) as strongly
//! typed aggregates, and implement the use-case services over the ports in
//! [`ports`]. Entities enforce their own invariants; services orchestrate
//! repositories and map port failures onto [`Error`].

pub mod auth_service;
pub mod authorization;
pub mod board;
pub mod board_service;
pub mod credentials;
pub mod error;
pub mod hierarchy;
pub mod hierarchy_service;
pub mod ids;
pub mod join_parent;
pub mod language;
pub mod membership;
pub mod organization;
pub mod organization_service;
pub mod phone;
pub mod poll;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;
pub mod voting_service;

pub use self::auth_service::AuthService;
pub use self::board::{Board, BoardStateError, BoardValidationError, BOARD_NAME_MAX};
pub use self::board_service::BoardService;
pub use self::credentials::{CredentialValidationError, LoginCredentials};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hierarchy::{descendant_ids, MAX_TRAVERSAL_NODES};
pub use self::hierarchy_service::HierarchyService;
pub use self::ids::{
    AnswerId, BoardId, JoinParentRequestId, OrganizationId, PollId, QuestionId, SessionId, UserId,
};
pub use self::join_parent::{
    JoinParentRequest, JoinParentStatus, JoinParentTransitionError, UnknownJoinParentStatus,
};
pub use self::language::{Language, UnsupportedLanguage};
pub use self::membership::{
    Membership, MembershipStatus, MembershipTransitionError, ReviewAction,
    UnknownMembershipStatus,
};
pub use self::organization::{
    Organization, OrganizationStateError, OrganizationValidationError, ORGANIZATION_NAME_MAX,
};
pub use self::organization_service::OrganizationService;
pub use self::phone::{PhoneNumber, PhoneValidationError};
pub use self::poll::{
    Answer, Participant, Poll, PollPage, Question, QuestionType, VoteDraft, VoteDraftError,
};
pub use self::session::{session_ttl, Session};
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{PasswordHash, User, UserValidationError, NAME_PART_MAX};
pub use self::voting_service::VotingService;

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
