//! Authentication domain services.
//!
//! Implements registration, credential login, logout, and session resolution
//! over the user/session repositories and the password capabilities. Login
//! failures for an unknown phone and a wrong password produce the same
//! message so callers cannot probe which phone numbers are registered.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    LoginUser, LogoutUser, PasswordHashError, PasswordHasher, PasswordVerifier, RegisterUser,
    RegisterUserRequest, SessionAuthenticator, SessionRepository, SessionRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, Session, SessionId, User, UserId};

/// Message returned for every credential failure, byte for byte.
const LOGIN_FAILURE: &str = "invalid phone number or password";

/// Authentication service implementing the auth driving ports.
#[derive(Clone)]
pub struct AuthService<U, S, H, V> {
    users: Arc<U>,
    sessions: Arc<S>,
    hasher: Arc<H>,
    verifier: Arc<V>,
}

impl<U, S, H, V> AuthService<U, S, H, V> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, sessions: Arc<S>, hasher: Arc<H>, verifier: Arc<V>) -> Self {
        Self {
            users,
            sessions,
            hasher,
            verifier,
        }
    }
}

impl<U, S, H, V> AuthService<U, S, H, V>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: PasswordVerifier,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicatePhone { .. } => {
                Error::conflict("phone number already registered")
            }
        }
    }

    fn map_session_error(error: SessionRepositoryError) -> Error {
        match error {
            SessionRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("session repository unavailable: {message}"))
            }
            SessionRepositoryError::Query { message } => {
                Error::internal(format!("session repository error: {message}"))
            }
        }
    }

    fn map_password_error(error: PasswordHashError) -> Error {
        match error {
            PasswordHashError::Hashing { message } => {
                Error::internal(format!("password hashing failed: {message}"))
            }
        }
    }
}

#[async_trait]
impl<U, S, H, V> RegisterUser for AuthService<U, S, H, V>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: PasswordVerifier,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, Error> {
        if self
            .users
            .exists(&request.phone)
            .await
            .map_err(Self::map_user_error)?
        {
            return Err(Error::conflict("phone number already registered"));
        }

        let password_hash = self
            .hasher
            .hash(request.password.as_str())
            .await
            .map_err(Self::map_password_error)?;

        let user = User::register(
            UserId::random(),
            request.first_name,
            request.last_name,
            request.phone,
            password_hash,
            request.language,
            Utc::now(),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.users.save(&user).await.map_err(Self::map_user_error)?;
        Ok(user)
    }
}

#[async_trait]
impl<U, S, H, V> LoginUser for AuthService<U, S, H, V>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: PasswordVerifier,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let Some(user) = self
            .users
            .find_by_phone(credentials.phone())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized(LOGIN_FAILURE));
        };

        let matches = self
            .verifier
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(Self::map_password_error)?;
        if !matches {
            return Err(Error::unauthorized(LOGIN_FAILURE));
        }

        let session = Session::issue(*user.id(), Utc::now());
        self.sessions
            .save(&session)
            .await
            .map_err(Self::map_session_error)?;
        Ok(session)
    }
}

#[async_trait]
impl<U, S, H, V> LogoutUser for AuthService<U, S, H, V>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: PasswordVerifier,
{
    async fn logout(&self, session_id: &SessionId) -> Result<(), Error> {
        self.sessions
            .delete(session_id)
            .await
            .map_err(Self::map_session_error)
    }
}

#[async_trait]
impl<U, S, H, V> SessionAuthenticator for AuthService<U, S, H, V>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
    V: PasswordVerifier,
{
    async fn authenticate(&self, session_id: &SessionId) -> Result<User, Error> {
        let Some(session) = self
            .sessions
            .find_by_id(session_id)
            .await
            .map_err(Self::map_session_error)?
        else {
            return Err(Error::unauthorized("session expired or unknown"));
        };

        if session.is_expired(Utc::now()) {
            self.sessions
                .delete(session_id)
                .await
                .map_err(Self::map_session_error)?;
            return Err(Error::unauthorized("session expired or unknown"));
        }

        let Some(user) = self
            .users
            .find_by_id(session.user_id())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized("session expired or unknown"));
        };

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use zeroize::Zeroizing;

    use super::*;
    use crate::domain::ports::{
        FixturePasswordHasher, MockSessionRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, Language, PasswordHash, PhoneNumber};

    fn phone() -> PhoneNumber {
        PhoneNumber::new("+14155550000").expect("valid phone")
    }

    fn registered_user(password: &str) -> User {
        User::register(
            UserId::random(),
            "Ada",
            None,
            phone(),
            PasswordHash::new(format!("fixture-hash:{password}")),
            Language::En,
            Utc::now(),
        )
        .expect("valid user")
    }

    fn make_service(
        users: MockUserRepository,
        sessions: MockSessionRepository,
    ) -> AuthService<
        MockUserRepository,
        MockSessionRepository,
        FixturePasswordHasher,
        FixturePasswordHasher,
    > {
        AuthService::new(
            Arc::new(users),
            Arc::new(sessions),
            Arc::new(FixturePasswordHasher),
            Arc::new(FixturePasswordHasher),
        )
    }

    fn register_request() -> RegisterUserRequest {
        RegisterUserRequest {
            first_name: "Ada".to_owned(),
            last_name: Some("Lovelace".to_owned()),
            phone: phone(),
            password: Zeroizing::new("secret".to_owned()),
            language: Language::En,
        }
    }

    #[tokio::test]
    async fn register_persists_a_hashed_password() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(1).return_once(|_| Ok(false));
        users
            .expect_save()
            .withf(|user: &User| user.password_hash().as_str() != "secret")
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(users, MockSessionRepository::new());
        let user = service
            .register(register_request())
            .await
            .expect("registration succeeds");
        assert_eq!(user.first_name(), "Ada");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_phone_without_persisting() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(1).return_once(|_| Ok(true));
        users.expect_save().times(0);

        let service = make_service(users, MockSessionRepository::new());
        let err = service
            .register(register_request())
            .await
            .expect_err("duplicate phone must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn register_rejects_blank_name_without_persisting() {
        let mut users = MockUserRepository::new();
        users.expect_exists().times(1).return_once(|_| Ok(false));
        users.expect_save().times(0);

        let service = make_service(users, MockSessionRepository::new());
        let mut request = register_request();
        request.first_name = "   ".to_owned();
        let err = service
            .register(request)
            .await
            .expect_err("blank first name must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn login_failure_messages_are_identical_for_both_causes() {
        let mut unknown_users = MockUserRepository::new();
        unknown_users
            .expect_find_by_phone()
            .times(1)
            .return_once(|_| Ok(None));
        let service = make_service(unknown_users, MockSessionRepository::new());
        let creds =
            LoginCredentials::try_from_parts("+14155550000", "whatever").expect("credentials");
        let unknown_phone = service.login(&creds).await.expect_err("unknown phone");

        let user = registered_user("right-password");
        let mut known_users = MockUserRepository::new();
        known_users
            .expect_find_by_phone()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        let service = make_service(known_users, MockSessionRepository::new());
        let creds =
            LoginCredentials::try_from_parts("+14155550000", "wrong-password").expect("credentials");
        let wrong_password = service.login(&creds).await.expect_err("wrong password");

        assert_eq!(unknown_phone.code(), ErrorCode::Unauthorized);
        assert_eq!(unknown_phone.message(), wrong_password.message());
    }

    #[tokio::test]
    async fn login_issues_a_thirty_day_session() {
        let user = registered_user("secret");
        let user_id = *user.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_phone()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        let mut sessions = MockSessionRepository::new();
        sessions.expect_save().times(1).return_once(|_| Ok(()));

        let service = make_service(users, sessions);
        let creds = LoginCredentials::try_from_parts("+14155550000", "secret").expect("credentials");
        let session = service.login(&creds).await.expect("login succeeds");
        assert_eq!(session.user_id(), &user_id);
        assert_eq!(
            session.expires_at() - session.created_at(),
            Duration::days(30)
        );
    }

    #[tokio::test]
    async fn authenticate_deletes_and_rejects_expired_sessions() {
        let expired = Session::from_parts(
            SessionId::random(),
            UserId::random(),
            Utc::now() - Duration::days(31),
            Utc::now() - Duration::days(1),
        );
        let session_id = *expired.id();
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(expired)));
        sessions
            .expect_delete()
            .withf(move |id: &SessionId| id == &session_id)
            .times(1)
            .return_once(|_| Ok(()));

        let service = make_service(MockUserRepository::new(), sessions);
        let err = service
            .authenticate(&session_id)
            .await
            .expect_err("expired session must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn authenticate_resolves_the_owning_user() {
        let user = registered_user("secret");
        let session = Session::issue(*user.id(), Utc::now());
        let session_id = *session.id();
        let expected_id = *user.id();

        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(session)));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));

        let service = make_service(users, sessions);
        let resolved = service
            .authenticate(&session_id)
            .await
            .expect("valid session resolves");
        assert_eq!(resolved.id(), &expected_id);
    }

    #[tokio::test]
    async fn logout_is_a_plain_delete() {
        let mut sessions = MockSessionRepository::new();
        sessions.expect_delete().times(1).return_once(|_| Ok(()));

        let service = make_service(MockUserRepository::new(), sessions);
        service
            .logout(&SessionId::random())
            .await
            .expect("logout succeeds");
    }
}
