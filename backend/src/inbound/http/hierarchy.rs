//! Organization-hierarchy HTTP handlers.
//!
//! ```text
//! POST   /api/v1/organizations/{id}/join-parent
//! GET    /api/v1/organizations/{id}/join-parent/incoming
//! POST   /api/v1/join-parent/{id}
//! DELETE /api/v1/join-parent/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RequestJoinParentRequest;
use crate::domain::{Error, JoinParentRequest, JoinParentRequestId, OrganizationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_user;
use crate::inbound::http::organizations::ReviewRequest;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request body for `POST /api/v1/organizations/{id}/join-parent`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinParentHttpRequest {
    pub parent_org_id: Option<OrganizationId>,
    pub message: Option<String>,
}

/// Join-parent request payload returned by the handlers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinParentResponse {
    pub id: String,
    pub child_org_id: String,
    pub parent_org_id: String,
    pub requested_by: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub rejection_reason: Option<String>,
}

impl From<JoinParentRequest> for JoinParentResponse {
    fn from(request: JoinParentRequest) -> Self {
        Self {
            id: request.id().to_string(),
            child_org_id: request.child_org_id().to_string(),
            parent_org_id: request.parent_org_id().to_string(),
            requested_by: request.requested_by().to_string(),
            message: request.message().map(str::to_owned),
            status: request.status().as_str().to_owned(),
            created_at: request.created_at().to_rfc3339(),
            resolved_at: request.resolved_at().map(|at| at.to_rfc3339()),
            rejection_reason: request.rejection_reason().map(str::to_owned),
        }
    }
}

/// Ask to attach the organization under a proposed parent.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/join-parent",
    params(("id" = String, Path, description = "Child organization id")),
    request_body = JoinParentHttpRequest,
    responses(
        (status = 201, description = "Request filed", body = JoinParentResponse),
        (status = 400, description = "Self-parent or descendant cycle", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin of the child", body = Error),
        (status = 409, description = "A request is already pending", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "requestJoinParent"
)]
#[post("/organizations/{id}/join-parent")]
pub async fn request_join_parent(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrganizationId>,
    payload: web::Json<JoinParentHttpRequest>,
) -> ApiResult<HttpResponse> {
    let actor = current_user(&state, &session).await?;
    let body = payload.into_inner();
    let parent_org_id = body
        .parent_org_id
        .ok_or_else(|| missing_field_error("parentOrgId"))?;
    let message = body
        .message
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty());
    let request = state
        .hierarchy
        .request_join_parent(RequestJoinParentRequest {
            child_org_id: path.into_inner(),
            parent_org_id,
            actor: *actor.id(),
            message,
        })
        .await?;
    Ok(HttpResponse::Created().json(JoinParentResponse::from(request)))
}

/// Pending requests naming the organization as the proposed parent.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/join-parent/incoming",
    params(("id" = String, Path, description = "Parent organization id")),
    responses(
        (status = 200, description = "Incoming requests", body = [JoinParentResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "listIncomingJoinParentRequests"
)]
#[get("/organizations/{id}/join-parent/incoming")]
pub async fn incoming_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Vec<JoinParentResponse>>> {
    let actor = current_user(&state, &session).await?;
    let requests = state
        .hierarchy_query
        .incoming_requests(&path.into_inner(), actor.id())
        .await?;
    Ok(web::Json(
        requests.into_iter().map(JoinParentResponse::from).collect(),
    ))
}

/// Accept or reject a pending join-parent request from the parent side.
#[utoipa::path(
    post,
    path = "/api/v1/join-parent/{id}",
    params(("id" = String, Path, description = "Join-parent request id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Request reviewed", body = JoinParentResponse),
        (status = 400, description = "Rejection without a reason", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin of the parent", body = Error),
        (status = 404, description = "Request not found", body = Error),
        (status = 409, description = "Request no longer pending", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "reviewJoinParentRequest"
)]
#[post("/join-parent/{id}")]
pub async fn review_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<JoinParentRequestId>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<JoinParentResponse>> {
    let actor = current_user(&state, &session).await?;
    let body = payload.into_inner();
    let request = state
        .hierarchy
        .handle_request(&path.into_inner(), actor.id(), body.action, body.reason)
        .await?;
    Ok(web::Json(JoinParentResponse::from(request)))
}

/// Withdraw a pending request from the child side.
#[utoipa::path(
    delete,
    path = "/api/v1/join-parent/{id}",
    params(("id" = String, Path, description = "Join-parent request id")),
    responses(
        (status = 204, description = "Request withdrawn"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin of the child", body = Error),
        (status = 404, description = "Request not found", body = Error),
        (status = 409, description = "Request no longer pending", body = Error)
    ),
    tags = ["hierarchy"],
    operation_id = "cancelJoinParentRequest"
)]
#[delete("/join-parent/{id}")]
pub async fn cancel_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<JoinParentRequestId>,
) -> ApiResult<HttpResponse> {
    let actor = current_user(&state, &session).await?;
    state
        .hierarchy
        .cancel_request(&path.into_inner(), actor.id())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
