//! Organization and membership HTTP handlers.
//!
//! ```text
//! POST /api/v1/organizations
//! POST /api/v1/organizations/{id}/join
//! GET  /api/v1/pending-requests
//! POST /api/v1/organizations/{id}/requests/{user_id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateOrganizationRequest;
use crate::domain::{Error, Membership, Organization, OrganizationId, ReviewAction, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, require_non_empty};

/// Request body for `POST /api/v1/organizations`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationHttpRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Admin decision payload shared by the review endpoints.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub action: ReviewAction,
    pub reason: Option<String>,
}

/// Organization payload returned by the handlers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub archived: bool,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id().to_string(),
            name: org.name().to_owned(),
            description: org.description().map(str::to_owned),
            parent_id: org.parent_id().map(ToString::to_string),
            created_by: org.created_by().to_string(),
            created_at: org.created_at().to_rfc3339(),
            archived: org.is_archived(),
        }
    }
}

/// Membership payload returned by the join and review endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub organization_id: String,
    pub user_id: String,
    pub status: String,
    pub requested_at: String,
    pub joined_at: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            organization_id: membership.organization_id().to_string(),
            user_id: membership.user_id().to_string(),
            status: membership.status().as_str().to_owned(),
            requested_at: membership.requested_at().to_rfc3339(),
            joined_at: membership.joined_at().map(|at| at.to_rfc3339()),
            rejected_at: membership.rejected_at().map(|at| at.to_rfc3339()),
            rejection_reason: membership.rejection_reason().map(str::to_owned),
        }
    }
}

fn parse_create_request(
    payload: CreateOrganizationHttpRequest,
    created_by: UserId,
) -> Result<CreateOrganizationRequest, Error> {
    let name = payload.name.ok_or_else(|| missing_field_error("name"))?;
    let name = require_non_empty(&name, "name")?;
    let description = payload
        .description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty());
    Ok(CreateOrganizationRequest {
        name,
        description,
        created_by,
    })
}

/// Create an organization; the creator becomes its first admin.
#[utoipa::path(
    post,
    path = "/api/v1/organizations",
    request_body = CreateOrganizationHttpRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "createOrganization"
)]
#[post("/organizations")]
pub async fn create_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrganizationHttpRequest>,
) -> ApiResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let request = parse_create_request(payload.into_inner(), *user.id())?;
    let organization = state.organizations.create_organization(request).await?;
    Ok(HttpResponse::Created().json(OrganizationResponse::from(organization)))
}

/// File a membership request for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/join",
    params(("id" = String, Path, description = "Organization id")),
    responses(
        (status = 201, description = "Request filed", body = MembershipResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Organization not found", body = Error),
        (status = 409, description = "Already pending or a member", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "joinOrganization"
)]
#[post("/organizations/{id}/join")]
pub async fn join_organization(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrganizationId>,
) -> ApiResult<HttpResponse> {
    let user = current_user(&state, &session).await?;
    let membership = state
        .memberships
        .join_organization(&path.into_inner(), user.id())
        .await?;
    Ok(HttpResponse::Created().json(MembershipResponse::from(membership)))
}

/// Pending membership requests across the organizations the caller
/// administers, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/pending-requests",
    responses(
        (status = 200, description = "Pending requests", body = [MembershipResponse]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "listPendingRequests"
)]
#[get("/pending-requests")]
pub async fn pending_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MembershipResponse>>> {
    let user = current_user(&state, &session).await?;
    let queue = state.pending_requests.pending_requests(user.id()).await?;
    Ok(web::Json(
        queue.into_iter().map(MembershipResponse::from).collect(),
    ))
}

/// Accept or reject a pending membership request.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/requests/{user_id}",
    params(
        ("id" = String, Path, description = "Organization id"),
        ("user_id" = String, Path, description = "Requesting user id")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Request reviewed", body = MembershipResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Request not found", body = Error),
        (status = 409, description = "Request no longer pending", body = Error)
    ),
    tags = ["organizations"],
    operation_id = "reviewJoinRequest"
)]
#[post("/organizations/{id}/requests/{user_id}")]
pub async fn review_join_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(OrganizationId, UserId)>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<MembershipResponse>> {
    let actor = current_user(&state, &session).await?;
    let (org_id, user_id) = path.into_inner();
    let body = payload.into_inner();
    let membership = state
        .memberships
        .handle_join_request(&org_id, &user_id, actor.id(), body.action, body.reason)
        .await?;
    Ok(web::Json(MembershipResponse::from(membership)))
}
