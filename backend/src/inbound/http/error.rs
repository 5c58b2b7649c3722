//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error types HTTP-agnostic while letting handlers turn
//! failures into consistent envelope responses and status codes. Raw storage
//! causes are logged server-side and never serialized to clients.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::domain::ports::BoxedCause;
use crate::domain::user::{ParseUserIdError, UserValidationError};
use crate::domain::user_service::{UserServiceError, UserServiceErrorKind};
use crate::inbound::http::envelope::ErrorResponse;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure kinds the HTTP layer reports to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Path id segment did not parse as an unsigned integer.
    InvalidId,
    /// Request body could not be decoded.
    InvalidRequest,
    /// Request payload failed field validation.
    Validation,
    DuplicateUser,
    FailedToSave,
    FailedToUpdate,
    UserNotFound,
    Internal,
}

fn status_for(kind: ApiErrorKind) -> StatusCode {
    match kind {
        ApiErrorKind::InvalidId | ApiErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ApiErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ApiErrorKind::DuplicateUser => StatusCode::CONFLICT,
        ApiErrorKind::UserNotFound => StatusCode::NOT_FOUND,
        ApiErrorKind::FailedToSave | ApiErrorKind::FailedToUpdate | ApiErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for(kind: ApiErrorKind) -> &'static str {
    match kind {
        ApiErrorKind::InvalidId => "invalid id",
        ApiErrorKind::InvalidRequest => "invalid request body",
        ApiErrorKind::Validation => "validation error",
        ApiErrorKind::DuplicateUser => "duplicate user",
        ApiErrorKind::FailedToSave => "failed to save user",
        ApiErrorKind::FailedToUpdate => "failed to update user",
        ApiErrorKind::UserNotFound => "user not found",
        ApiErrorKind::Internal => "internal server error",
    }
}

/// Handler-layer error rendered as the failure envelope.
#[derive(Debug, Error)]
#[error("{}", message_for(*.kind))]
pub struct ApiError {
    kind: ApiErrorKind,
    errors: Option<Value>,
    #[source]
    source: Option<BoxedCause>,
}

impl ApiError {
    fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            errors: None,
            source: None,
        }
    }

    /// Failure kind for assertions and cross-layer comparisons.
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// 400 response for an unparseable path id.
    pub fn invalid_id() -> Self {
        Self::new(ApiErrorKind::InvalidId)
    }

    /// 400 response for an undecodable body, with a safe decode detail.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            errors: Some(json!({ "detail": detail.into() })),
            ..Self::new(ApiErrorKind::InvalidRequest)
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind)
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!(error = %self, source = ?self.source, "request failed");
        }
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(
            message_for(self.kind),
            self.errors.clone(),
        ))
    }
}

impl From<UserServiceError> for ApiError {
    fn from(error: UserServiceError) -> Self {
        let kind = match error.kind() {
            UserServiceErrorKind::DuplicateUser => ApiErrorKind::DuplicateUser,
            UserServiceErrorKind::FailedToSave => ApiErrorKind::FailedToSave,
            UserServiceErrorKind::FailedToUpdate => ApiErrorKind::FailedToUpdate,
            UserServiceErrorKind::UserNotFound => ApiErrorKind::UserNotFound,
            UserServiceErrorKind::Internal => ApiErrorKind::Internal,
        };
        Self {
            source: Some(Box::new(error)),
            ..Self::new(kind)
        }
    }
}

impl From<UserValidationError> for ApiError {
    fn from(error: UserValidationError) -> Self {
        let details: Vec<Value> = error
            .violations()
            .iter()
            .map(|violation| {
                json!({
                    "field": violation.field(),
                    "code": violation.code(),
                    "message": violation.to_string(),
                })
            })
            .collect();
        Self {
            errors: Some(Value::Array(details)),
            source: Some(Box::new(error)),
            ..Self::new(ApiErrorKind::Validation)
        }
    }
}

impl From<ParseUserIdError> for ApiError {
    fn from(error: ParseUserIdError) -> Self {
        Self {
            source: Some(Box::new(error)),
            ..Self::new(ApiErrorKind::InvalidId)
        }
    }
}
