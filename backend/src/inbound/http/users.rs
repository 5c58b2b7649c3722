//! User API handlers.
//!
//! ```text
//! POST   /api/v1/user       {"name":"Ann","family":"Lee","email":"ann@x.com","age":30}
//! GET    /api/v1/user/{id}
//! PATCH  /api/v1/user/{id}  {"age":31}
//! GET    /api/v1/user
//! DELETE /api/v1/user/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::user::{NewUser, User, UserId, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, ErrorResponse};
use crate::inbound::http::state::HttpState;

pub(crate) const MSG_CREATED: &str = "user created successfully";
pub(crate) const MSG_RETRIEVED: &str = "user retrieved successfully";
pub(crate) const MSG_UPDATED: &str = "user updated successfully";
pub(crate) const MSG_LISTED: &str = "users retrieved successfully";
pub(crate) const MSG_DELETED: &str = "user deleted successfully";

/// Request body for `POST /api/v1/user`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub family: String,
    pub email: String,
    pub age: i32,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = crate::domain::user::UserValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Self::new(value.name, value.family, value.email, value.age)
    }
}

/// Request body for `PATCH /api/v1/user/{id}`; absent fields are untouched.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            name: value.name,
            family: value.family,
            email: value.email,
            age: value.age,
        }
    }
}

/// User record as serialized in response envelopes.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub family: String,
    pub email: String,
    pub age: i32,
}

/// Confirmation payload for `DELETE /api/v1/user/{id}`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeletedUserResponse {
    pub id: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name,
            family: user.family,
            email: user.email,
            age: user.age,
        }
    }
}

fn parse_id(raw: &str) -> ApiResult<UserId> {
    Ok(raw.parse::<UserId>()?)
}

fn user_envelope(message: &str, user: User) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(message, UserResponse::from(user)))
}

/// Create a user from a validated payload.
#[utoipa::path(
    post,
    path = "/api/v1/user",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Payload failed validation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = NewUser::try_from(payload.into_inner())?;
    let user = state.users.create(draft).await?;
    Ok(user_envelope(MSG_CREATED, user))
}

/// Fetch a single user by id.
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 400, description = "Id is not an unsigned integer", body = ErrorResponse),
        (status = 404, description = "No user with that id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let user = state.users.find_by_id(id).await?;
    Ok(user_envelope(MSG_RETRIEVED, user))
}

/// Apply a partial update to an existing user.
///
/// The patch is validated before the current record is fetched, so an
/// invalid payload never costs a storage round-trip.
#[utoipa::path(
    patch,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Malformed request or id", body = ErrorResponse),
        (status = 404, description = "No user with that id", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Payload failed validation", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/user/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let patch = UserUpdate::from(payload.into_inner());
    patch.validate()?;

    let current = state.users.find_by_id(id).await?;
    let user = state.users.update(patch.apply(current)).await?;
    Ok(user_envelope(MSG_UPDATED, user))
}

/// List all users.
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/user")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_LISTED, users)))
}

/// Delete a user by id.
#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "Numeric user id")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<DeletedUserResponse>),
        (status = 400, description = "Id is not an unsigned integer", body = ErrorResponse),
        (status = 404, description = "No user with that id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.users.delete(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_DELETED,
        DeletedUserResponse { id: id.value() },
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::user_service::{
        MockUserUseCase, UserServiceError, UserServiceErrorKind,
    };
    use crate::server::json_config;

    fn stored(id: i64) -> User {
        User {
            id: UserId::new(id),
            name: "Ann".into(),
            family: "Lee".into(),
            email: "ann@x.com".into(),
            age: 30,
        }
    }

    async fn call(
        users: MockUserUseCase,
        request: actix_web::test::TestRequest,
    ) -> (StatusCode, Value) {
        let state = web::Data::new(HttpState::new(Arc::new(users)));
        let app = actix_test::init_service(
            App::new().app_data(state).app_data(json_config()).service(
                web::scope("/api/v1")
                    .service(create_user)
                    .service(list_users)
                    .service(get_user)
                    .service(update_user)
                    .service(delete_user),
            ),
        )
        .await;

        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("envelope JSON");
        (status, value)
    }

    #[actix_web::test]
    async fn create_returns_the_stored_user() {
        let mut users = MockUserUseCase::new();
        users.expect_create().times(1).return_once(|_| Ok(stored(7)));

        let request = actix_test::TestRequest::post().uri("/api/v1/user").set_json(json!({
            "name": "Ann", "family": "Lee", "email": "ann@x.com", "age": 30
        }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!(MSG_CREATED));
        assert_eq!(body["data"]["id"], json!(7));
        assert_eq!(body["data"]["email"], json!("ann@x.com"));
    }

    #[actix_web::test]
    async fn create_rejects_invalid_fields_without_calling_the_service() {
        let mut users = MockUserUseCase::new();
        users.expect_create().times(0);

        let request = actix_test::TestRequest::post().uri("/api/v1/user").set_json(json!({
            "name": "A", "family": "Lee", "email": "not-an-email", "age": 12
        }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("validation error"));
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors.len(), 3);
    }

    #[actix_web::test]
    async fn create_rejects_malformed_json_with_bad_request() {
        let mut users = MockUserUseCase::new();
        users.expect_create().times(0);

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/user")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("invalid request body"));
    }

    #[rstest]
    #[case::duplicate(UserServiceErrorKind::DuplicateUser, StatusCode::CONFLICT, "duplicate user")]
    #[case::save_failure(
        UserServiceErrorKind::FailedToSave,
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to save user"
    )]
    #[case::internal(
        UserServiceErrorKind::Internal,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error"
    )]
    #[actix_web::test]
    async fn create_maps_service_failures(
        #[case] kind: UserServiceErrorKind,
        #[case] expected_status: StatusCode,
        #[case] expected_message: &str,
    ) {
        let mut users = MockUserUseCase::new();
        users
            .expect_create()
            .times(1)
            .return_once(move |_| Err(UserServiceError::new(kind)));

        let request = actix_test::TestRequest::post().uri("/api/v1/user").set_json(json!({
            "name": "Ann", "family": "Lee", "email": "ann@x.com", "age": 30
        }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, expected_status);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!(expected_message));
    }

    #[actix_web::test]
    async fn get_returns_the_user() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_by_id()
            .with(eq(UserId::new(7)))
            .times(1)
            .return_once(|_| Ok(stored(7)));

        let request = actix_test::TestRequest::get().uri("/api/v1/user/7");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!(MSG_RETRIEVED));
        assert_eq!(body["data"]["name"], json!("Ann"));
    }

    #[rstest]
    #[case::alphabetic("abc")]
    #[case::negative("-3")]
    #[case::fractional("1.5")]
    #[actix_web::test]
    async fn get_rejects_non_numeric_ids(#[case] raw: &str) {
        let mut users = MockUserUseCase::new();
        users.expect_find_by_id().times(0);

        let request = actix_test::TestRequest::get().uri(&format!("/api/v1/user/{raw}"));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("invalid id"));
    }

    #[actix_web::test]
    async fn get_maps_missing_user_to_not_found() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Err(UserServiceError::new(UserServiceErrorKind::UserNotFound)));

        let request = actix_test::TestRequest::get().uri("/api/v1/user/404");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("user not found"));
    }

    #[actix_web::test]
    async fn update_applies_only_the_provided_fields() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_by_id()
            .with(eq(UserId::new(7)))
            .times(1)
            .return_once(|_| Ok(stored(7)));
        users
            .expect_update()
            .withf(|user| {
                user.id == UserId::new(7)
                    && user.age == 31
                    && user.name == "Ann"
                    && user.email == "ann@x.com"
            })
            .times(1)
            .return_once(|user| Ok(user));

        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/user/7")
            .set_json(json!({ "age": 31 }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!(MSG_UPDATED));
        assert_eq!(body["data"]["age"], json!(31));
        assert_eq!(body["data"]["name"], json!("Ann"));
    }

    #[actix_web::test]
    async fn update_validates_the_patch_before_fetching() {
        let mut users = MockUserUseCase::new();
        users.expect_find_by_id().times(0);
        users.expect_update().times(0);

        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/user/7")
            .set_json(json!({ "age": 300 }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_array().expect("errors array");
        assert_eq!(errors[0]["field"], json!("age"));
    }

    #[actix_web::test]
    async fn update_surfaces_missing_user_from_the_fetch() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Err(UserServiceError::new(UserServiceErrorKind::UserNotFound)));
        users.expect_update().times(0);

        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/user/9")
            .set_json(json!({ "age": 31 }));
        let (status, _) = call(users, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn update_maps_duplicate_email_to_conflict() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(stored(7)));
        users
            .expect_update()
            .times(1)
            .return_once(|_| Err(UserServiceError::new(UserServiceErrorKind::DuplicateUser)));

        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/user/7")
            .set_json(json!({ "email": "taken@x.com" }));
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], json!("duplicate user"));
    }

    #[actix_web::test]
    async fn list_returns_an_empty_array_when_no_users_exist() {
        let mut users = MockUserUseCase::new();
        users.expect_find_all().times(1).return_once(|| Ok(vec![]));

        let request = actix_test::TestRequest::get().uri("/api/v1/user");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!(MSG_LISTED));
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn list_returns_every_user() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_all()
            .times(1)
            .return_once(|| Ok(vec![stored(1), stored(2)]));

        let request = actix_test::TestRequest::get().uri("/api/v1/user");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[1]["id"], json!(2));
    }

    #[actix_web::test]
    async fn list_maps_failures_to_internal_error() {
        let mut users = MockUserUseCase::new();
        users
            .expect_find_all()
            .times(1)
            .return_once(|| Err(UserServiceError::new(UserServiceErrorKind::Internal)));

        let request = actix_test::TestRequest::get().uri("/api/v1/user");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], json!("internal server error"));
    }

    #[actix_web::test]
    async fn delete_confirms_removal_with_the_deleted_id() {
        let mut users = MockUserUseCase::new();
        users
            .expect_delete()
            .with(eq(UserId::new(7)))
            .times(1)
            .return_once(|_| Ok(()));

        let request = actix_test::TestRequest::delete().uri("/api/v1/user/7");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!(MSG_DELETED));
        assert_eq!(body["data"]["id"], json!(7));
    }

    #[actix_web::test]
    async fn delete_maps_missing_user_to_not_found() {
        let mut users = MockUserUseCase::new();
        users
            .expect_delete()
            .times(1)
            .return_once(|_| Err(UserServiceError::new(UserServiceErrorKind::UserNotFound)));

        let request = actix_test::TestRequest::delete().uri("/api/v1/user/9");
        let (status, body) = call(users, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("user not found"));
    }
}
