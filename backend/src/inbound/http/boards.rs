//! Board HTTP handlers.
//!
//! ```text
//! POST /api/v1/organizations/{id}/boards
//! GET  /api/v1/organizations/{id}/boards
//! POST /api/v1/boards/{id}/archive
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateBoardRequest;
use crate::domain::{Board, BoardId, Error, OrganizationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_user;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, require_non_empty};

/// Request body for `POST /api/v1/organizations/{id}/boards`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardHttpRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub general: bool,
}

/// Board payload returned by the handlers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub general: bool,
    pub created_at: String,
    pub archived: bool,
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            id: board.id().to_string(),
            organization_id: board.organization_id().to_string(),
            name: board.name().to_owned(),
            general: board.is_general(),
            created_at: board.created_at().to_rfc3339(),
            archived: board.is_archived(),
        }
    }
}

/// Create a board under an organization.
#[utoipa::path(
    post,
    path = "/api/v1/organizations/{id}/boards",
    params(("id" = String, Path, description = "Organization id")),
    request_body = CreateBoardHttpRequest,
    responses(
        (status = 201, description = "Board created", body = BoardResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Organization not found", body = Error)
    ),
    tags = ["boards"],
    operation_id = "createBoard"
)]
#[post("/organizations/{id}/boards")]
pub async fn create_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrganizationId>,
    payload: web::Json<CreateBoardHttpRequest>,
) -> ApiResult<HttpResponse> {
    let actor = current_user(&state, &session).await?;
    let body = payload.into_inner();
    let name = body.name.ok_or_else(|| missing_field_error("name"))?;
    let name = require_non_empty(&name, "name")?;
    let board = state
        .boards
        .create_board(CreateBoardRequest {
            organization_id: path.into_inner(),
            name,
            general: body.general,
            actor: *actor.id(),
        })
        .await?;
    Ok(HttpResponse::Created().json(BoardResponse::from(board)))
}

/// List an organization's boards, archived ones included.
#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}/boards",
    params(("id" = String, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Boards", body = [BoardResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Organization not found", body = Error)
    ),
    tags = ["boards"],
    operation_id = "listBoards"
)]
#[get("/organizations/{id}/boards")]
pub async fn list_boards(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<OrganizationId>,
) -> ApiResult<web::Json<Vec<BoardResponse>>> {
    let actor = current_user(&state, &session).await?;
    let boards = state
        .boards_query
        .list_boards(&path.into_inner(), actor.id())
        .await?;
    Ok(web::Json(
        boards.into_iter().map(BoardResponse::from).collect(),
    ))
}

/// Archive a board. Archiving is terminal.
#[utoipa::path(
    post,
    path = "/api/v1/boards/{id}/archive",
    params(("id" = String, Path, description = "Board id")),
    responses(
        (status = 200, description = "Board archived", body = BoardResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Board not found", body = Error),
        (status = 409, description = "Already archived", body = Error)
    ),
    tags = ["boards"],
    operation_id = "archiveBoard"
)]
#[post("/boards/{id}/archive")]
pub async fn archive_board(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BoardId>,
) -> ApiResult<web::Json<BoardResponse>> {
    let actor = current_user(&state, &session).await?;
    let board = state
        .boards
        .archive_board(&path.into_inner(), actor.id())
        .await?;
    Ok(web::Json(BoardResponse::from(board)))
}
