//! Wire-format error bodies shared by all endpoints.
//!
//! Two shapes exist:
//! - `{"error": "..."}` for single-message failures (not found,
//!   malformed input, server errors);
//! - `{"errors": [{"field": "...", "message": "..."}]}` for payload
//!   validation failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Single-message error body: `{"error": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// One violated constraint on a payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation error body: `{"errors": [...]}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViolationsBody {
    pub errors: Vec<FieldViolation>,
}

impl ViolationsBody {
    pub fn new(errors: Vec<FieldViolation>) -> Self {
        Self { errors }
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("Not found")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorBody::new("Invalid JSON")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Invalid JSON"}));
    }

    #[test]
    fn test_violations_body_shape() {
        let body = serde_json::to_value(ViolationsBody::new(vec![FieldViolation::new(
            "name",
            "This value should not be blank.",
        )]))
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "errors": [{"field": "name", "message": "This value should not be blank."}]
            })
        );
    }
}
