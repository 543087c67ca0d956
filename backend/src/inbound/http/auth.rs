//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/register
//! POST /api/v1/login
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::RegisterUserRequest;
use crate::domain::{CredentialValidationError, Error, LoginCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    empty_field_error, missing_field_error, parse_language, parse_phone, require_non_empty,
};

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub language: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// User payload returned by `/register` and `/me`. Never carries the
/// password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub language: String,
    pub superadmin: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().map(str::to_owned),
            phone: user.phone().as_ref().to_owned(),
            language: user.language().to_string(),
            superadmin: user.is_superadmin(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

fn parse_register_request(payload: RegisterRequest) -> Result<RegisterUserRequest, Error> {
    let first_name = payload
        .first_name
        .ok_or_else(|| missing_field_error("firstName"))?;
    let first_name = require_non_empty(&first_name, "firstName")?;
    let last_name = payload
        .last_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());
    let phone = payload.phone.ok_or_else(|| missing_field_error("phone"))?;
    let phone = parse_phone(&phone)?;
    let password = payload
        .password
        .ok_or_else(|| missing_field_error("password"))?;
    if password.is_empty() {
        return Err(empty_field_error("password"));
    }
    let language = parse_language(payload.language)?;

    Ok(RegisterUserRequest {
        first_name,
        last_name,
        phone,
        password: Zeroizing::new(password),
        language,
    })
}

fn map_credential_error(error: CredentialValidationError) -> Error {
    match error {
        CredentialValidationError::InvalidPhone(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": "phone", "code": "invalid_phone" })),
        CredentialValidationError::EmptyPassword => empty_field_error("password"),
    }
}

/// Resolve the authenticated user behind the request's session cookie.
pub(crate) async fn current_user(
    state: &HttpState,
    session: &SessionContext,
) -> Result<User, Error> {
    let session_id = session.require_session_id()?;
    state.authenticator.authenticate(&session_id).await
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Phone already registered", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = parse_register_request(payload.into_inner())?;
    let user = state.register.register(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
///
/// Unknown phone numbers and wrong passwords produce the same error body so
/// account existence cannot be probed.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.phone, &body.password)
        .map_err(map_credential_error)?;
    let issued = state.login.login(&credentials).await?;
    session.persist(issued.id())?;
    Ok(HttpResponse::Ok().finish())
}

/// Revoke the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "No active session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let session_id = session.require_session_id()?;
    state.logout.logout(&session_id).await?;
    session.clear();
    Ok(HttpResponse::Ok().finish())
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user = current_user(&state, &session).await?;
    Ok(web::Json(UserResponse::from(user)))
}
