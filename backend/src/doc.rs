//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API. It registers the user CRUD endpoints, the health
//! probes, and the envelope and DTO schemas. The generated specification is
//! served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::envelope::{ApiResponse, ErrorResponse};
use crate::inbound::http::users::{
    CreateUserRequest, DeletedUserResponse, UpdateUserRequest, UserResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User manager API",
        description = "CRUD interface for the user resource plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        UserResponse,
        DeletedUserResponse,
        ApiResponse<UserResponse>,
        ApiResponse<Vec<UserResponse>>,
        ApiResponse<DeletedUserResponse>,
        ErrorResponse,
    )),
    tags(
        (name = "users", description = "Operations on the user resource"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_registers_every_user_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/user"));
        assert!(paths.contains_key("/api/v1/user/{id}"));
        assert!(paths.contains_key("/health/ready"));
        assert!(paths.contains_key("/health/live"));
    }

    #[test]
    fn openapi_registers_the_envelope_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key("UserResponse"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
