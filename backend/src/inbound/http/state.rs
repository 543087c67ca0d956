//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BoardCommand, BoardQuery, FixtureBoardCommand, FixtureBoardQuery, FixtureHierarchyCommand,
    FixtureHierarchyQuery, FixtureLoginUser, FixtureLogoutUser, FixtureMembershipCommand,
    FixtureOrganizationCommand, FixturePendingRequestsQuery, FixtureRegisterUser,
    FixtureSessionAuthenticator, FixtureVotingCommand, HierarchyCommand, HierarchyQuery,
    LoginUser, LogoutUser, MembershipCommand, OrganizationCommand, PendingRequestsQuery,
    RegisterUser, SessionAuthenticator, VotingCommand,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub register: Arc<dyn RegisterUser>,
    pub login: Arc<dyn LoginUser>,
    pub logout: Arc<dyn LogoutUser>,
    pub authenticator: Arc<dyn SessionAuthenticator>,
    pub organizations: Arc<dyn OrganizationCommand>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub pending_requests: Arc<dyn PendingRequestsQuery>,
    pub hierarchy: Arc<dyn HierarchyCommand>,
    pub hierarchy_query: Arc<dyn HierarchyQuery>,
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
    pub voting: Arc<dyn VotingCommand>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            register: Arc::new(FixtureRegisterUser),
            login: Arc::new(FixtureLoginUser),
            logout: Arc::new(FixtureLogoutUser),
            authenticator: Arc::new(FixtureSessionAuthenticator),
            organizations: Arc::new(FixtureOrganizationCommand),
            memberships: Arc::new(FixtureMembershipCommand),
            pending_requests: Arc::new(FixturePendingRequestsQuery),
            hierarchy: Arc::new(FixtureHierarchyCommand),
            hierarchy_query: Arc::new(FixtureHierarchyQuery),
            boards: Arc::new(FixtureBoardCommand),
            boards_query: Arc::new(FixtureBoardQuery),
            voting: Arc::new(FixtureVotingCommand),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub register: Arc<dyn RegisterUser>,
    pub login: Arc<dyn LoginUser>,
    pub logout: Arc<dyn LogoutUser>,
    pub authenticator: Arc<dyn SessionAuthenticator>,
    pub organizations: Arc<dyn OrganizationCommand>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub pending_requests: Arc<dyn PendingRequestsQuery>,
    pub hierarchy: Arc<dyn HierarchyCommand>,
    pub hierarchy_query: Arc<dyn HierarchyQuery>,
    pub boards: Arc<dyn BoardCommand>,
    pub boards_query: Arc<dyn BoardQuery>,
    pub voting: Arc<dyn VotingCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            register,
            login,
            logout,
            authenticator,
            organizations,
            memberships,
            pending_requests,
            hierarchy,
            hierarchy_query,
            boards,
            boards_query,
            voting,
        } = ports;
        Self {
            register,
            login,
            logout,
            authenticator,
            organizations,
            memberships,
            pending_requests,
            hierarchy,
            hierarchy_query,
            boards,
            boards_query,
            voting,
        }
    }

    /// State wired entirely to fixtures; every port refuses its requests.
    pub fn fixtures() -> Self {
        Self::new(HttpStatePorts::default())
    }
}
