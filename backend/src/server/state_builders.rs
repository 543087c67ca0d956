//! Builders wiring repository-backed services into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{
    AuthService, BoardService, HierarchyService, OrganizationService, VotingService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DbPool, DieselBoardRepository, DieselJoinParentRepository, DieselMembershipRepository,
    DieselOrganizationRepository, DieselPollRepository, DieselSessionRepository,
    DieselUserRepository, DieselVoteDraftRepository,
};
use crate::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build the HTTP state from configuration.
///
/// Uses database-backed services when a pool is available, otherwise fixture
/// ports so the HTTP surface stays reachable without a database.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    match &config.db_pool {
        Some(pool) => web::Data::new(HttpState::new(build_database_ports(pool))),
        None => web::Data::new(HttpState::fixtures()),
    }
}

fn build_database_ports(pool: &DbPool) -> HttpStatePorts {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let sessions = Arc::new(DieselSessionRepository::new(pool.clone()));
    let orgs = Arc::new(DieselOrganizationRepository::new(pool.clone()));
    let memberships = Arc::new(DieselMembershipRepository::new(pool.clone()));
    let join_parent = Arc::new(DieselJoinParentRepository::new(pool.clone()));
    let boards = Arc::new(DieselBoardRepository::new(pool.clone()));
    let polls = Arc::new(DieselPollRepository::new(pool.clone()));
    let drafts = Arc::new(DieselVoteDraftRepository::new(pool.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let auth = Arc::new(AuthService::new(
        users.clone(),
        sessions,
        hasher.clone(),
        hasher,
    ));
    let organizations = Arc::new(OrganizationService::new(
        orgs.clone(),
        memberships,
        users.clone(),
    ));
    let hierarchy = Arc::new(HierarchyService::new(
        orgs.clone(),
        join_parent,
        users.clone(),
    ));
    let board = Arc::new(BoardService::new(orgs, boards, users));
    let voting = Arc::new(VotingService::new(polls, drafts));

    HttpStatePorts {
        register: auth.clone(),
        login: auth.clone(),
        logout: auth.clone(),
        authenticator: auth,
        organizations: organizations.clone(),
        memberships: organizations.clone(),
        pending_requests: organizations,
        hierarchy: hierarchy.clone(),
        hierarchy_query: hierarchy,
        boards: board.clone(),
        boards_query: board,
        voting,
    }
}
