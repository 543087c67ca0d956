//! Vote-draft HTTP handlers.
//!
//! ```text
//! PUT  /api/v1/polls/{id}/draft
//! POST /api/v1/polls/{id}/finish
//! ```

use std::collections::BTreeMap;

use actix_web::{post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SaveDraftRequest;
use crate::domain::{AnswerId, Error, PollId, QuestionId, VoteDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `PUT /api/v1/polls/{id}/draft`. The selection map
/// replaces the whole draft; questions absent from the map are cleared.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftHttpRequest {
    #[serde(default)]
    pub selections: BTreeMap<QuestionId, Vec<AnswerId>>,
}

/// Draft payload returned by both endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteDraftResponse {
    pub poll_id: String,
    pub selections: BTreeMap<QuestionId, Vec<AnswerId>>,
    pub finished_at: Option<String>,
}

impl From<VoteDraft> for VoteDraftResponse {
    fn from(draft: VoteDraft) -> Self {
        Self {
            poll_id: draft.poll_id().to_string(),
            selections: draft.selections().clone(),
            finished_at: draft.finished_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Save the caller's draft for a poll, replacing any previous selections.
#[utoipa::path(
    put,
    path = "/api/v1/polls/{id}/draft",
    params(("id" = String, Path, description = "Poll id")),
    request_body = SaveDraftHttpRequest,
    responses(
        (status = 200, description = "Draft saved", body = VoteDraftResponse),
        (status = 400, description = "Unknown question or answer id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a participant", body = Error),
        (status = 404, description = "Poll not found", body = Error),
        (status = 409, description = "Draft already finished", body = Error)
    ),
    tags = ["votes"],
    operation_id = "saveVoteDraft"
)]
#[put("/polls/{id}/draft")]
pub async fn save_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PollId>,
    payload: web::Json<SaveDraftHttpRequest>,
) -> ApiResult<web::Json<VoteDraftResponse>> {
    let user = current_user(&state, &session).await?;
    let draft = state
        .voting
        .save_draft(SaveDraftRequest {
            poll_id: path.into_inner(),
            user_id: *user.id(),
            selections: payload.into_inner().selections,
        })
        .await?;
    Ok(web::Json(VoteDraftResponse::from(draft)))
}

/// Lock the caller's draft. Finishing is terminal.
#[utoipa::path(
    post,
    path = "/api/v1/polls/{id}/finish",
    params(("id" = String, Path, description = "Poll id")),
    responses(
        (status = 200, description = "Draft finished", body = VoteDraftResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No draft for this poll", body = Error),
        (status = 409, description = "Draft already finished", body = Error)
    ),
    tags = ["votes"],
    operation_id = "finishVoteDraft"
)]
#[post("/polls/{id}/finish")]
pub async fn finish_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PollId>,
) -> ApiResult<web::Json<VoteDraftResponse>> {
    let user = current_user(&state, &session).await?;
    let draft = state
        .voting
        .finish_draft(&path.into_inner(), user.id())
        .await?;
    Ok(web::Json(VoteDraftResponse::from(draft)))
}
