//! Uniform JSON response envelope.
//!
//! Every endpoint responds with `{success, message, data?}` on success and
//! `{success, message, errors?}` on failure, so clients can branch on
//! `success` without inspecting status codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Success envelope wrapping the endpoint-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Build a success envelope carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Failure envelope with an optional safe error detail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl ErrorResponse {
    /// Build a failure envelope.
    pub fn new(message: impl Into<String>, errors: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}
