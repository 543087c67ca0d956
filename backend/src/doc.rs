//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the shared
//! error envelope, and the session cookie security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::boards::{BoardResponse, CreateBoardHttpRequest};
use crate::inbound::http::hierarchy::{JoinParentHttpRequest, JoinParentResponse};
use crate::inbound::http::organizations::{
    CreateOrganizationHttpRequest, MembershipResponse, OrganizationResponse, ReviewRequest,
};
use crate::inbound::http::votes::{SaveDraftHttpRequest, VoteDraftResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Governance backend API",
        description = "HTTP interface for organization governance: accounts, \
                       memberships, hierarchy, boards, and vote drafts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::organizations::create_organization,
        crate::inbound::http::organizations::join_organization,
        crate::inbound::http::organizations::pending_requests,
        crate::inbound::http::organizations::review_join_request,
        crate::inbound::http::hierarchy::request_join_parent,
        crate::inbound::http::hierarchy::incoming_requests,
        crate::inbound::http::hierarchy::review_request,
        crate::inbound::http::hierarchy::cancel_request,
        crate::inbound::http::boards::create_board,
        crate::inbound::http::boards::list_boards,
        crate::inbound::http::boards::archive_board,
        crate::inbound::http::votes::save_draft,
        crate::inbound::http::votes::finish_draft,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        CreateOrganizationHttpRequest,
        OrganizationResponse,
        MembershipResponse,
        ReviewRequest,
        JoinParentHttpRequest,
        JoinParentResponse,
        CreateBoardHttpRequest,
        BoardResponse,
        SaveDraftHttpRequest,
        VoteDraftResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and the current session"),
        (name = "organizations", description = "Organizations and membership requests"),
        (name = "hierarchy", description = "Parent-child organization links"),
        (name = "boards", description = "Discussion boards"),
        (name = "votes", description = "Vote drafts on board polls"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_registers_every_governance_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/organizations",
            "/api/v1/organizations/{id}/join",
            "/api/v1/organizations/{id}/join-parent",
            "/api/v1/organizations/{id}/boards",
            "/api/v1/polls/{id}/draft",
            "/healthz/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path '{path}'"
            );
        }
    }
}
