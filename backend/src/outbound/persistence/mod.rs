//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: database failures are mapped to the port
//!   error enums, with unique-constraint violations routed to the dedicated
//!   duplicate variants.

mod diesel_board_repository;
mod diesel_join_parent_repository;
mod diesel_membership_repository;
mod diesel_organization_repository;
mod diesel_poll_repository;
mod diesel_session_repository;
mod diesel_user_repository;
mod diesel_vote_draft_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_board_repository::DieselBoardRepository;
pub use diesel_join_parent_repository::DieselJoinParentRepository;
pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_poll_repository::DieselPollRepository;
pub use diesel_session_repository::DieselSessionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vote_draft_repository::DieselVoteDraftRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
