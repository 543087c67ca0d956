//! Driving ports for registration, login, and session authentication.
//!
//! Inbound adapters call these to run authentication use-cases without
//! knowing the backing infrastructure, which keeps HTTP handler tests
//! deterministic: they substitute a test double instead of wiring
//! persistence and a KDF.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{
    Error, Language, LoginCredentials, PasswordHash, PhoneNumber, Session, SessionId, User,
};

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: PhoneNumber,
    pub password: Zeroizing<String>,
    pub language: Language,
}

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegisterUser: Send + Sync {
    /// Register a new user; duplicate phone numbers are a conflict.
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error>;
}

/// Domain use-case port for credential login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginUser: Send + Sync {
    /// Validate credentials and issue a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error>;
}

/// Domain use-case port for logout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogoutUser: Send + Sync {
    /// Revoke one session; revoking an unknown session succeeds.
    async fn logout(&self, session_id: &SessionId) -> Result<(), Error>;
}

/// Domain use-case port resolving a session cookie to its user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Resolve `session_id` to the owning user, rejecting expired sessions.
    async fn authenticate(&self, session_id: &SessionId) -> Result<User, Error>;
}

/// Fixture registration used until persistence is wired: echoes the request
/// back as a user with a marker hash and never persists anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegisterUser;

#[async_trait]
impl RegisterUser for FixtureRegisterUser {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        User::register(
            crate::domain::UserId::random(),
            request.first_name,
            request.last_name,
            request.phone,
            PasswordHash::new("fixture-hash"),
            request.language,
            chrono::Utc::now(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Fixture login that rejects every credential pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginUser;

#[async_trait]
impl LoginUser for FixtureLoginUser {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<Session, Error> {
        Err(Error::unauthorized("invalid phone number or password"))
    }
}

/// Fixture logout that always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLogoutUser;

#[async_trait]
impl LogoutUser for FixtureLogoutUser {
    async fn logout(&self, _session_id: &SessionId) -> Result<(), Error> {
        Ok(())
    }
}

/// Fixture authenticator that treats every session as unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionAuthenticator;

#[async_trait]
impl SessionAuthenticator for FixtureSessionAuthenticator {
    async fn authenticate(&self, _session_id: &SessionId) -> Result<User, Error> {
        Err(Error::unauthorized("session expired or unknown"))
    }
}
