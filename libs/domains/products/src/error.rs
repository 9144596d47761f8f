use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_helpers::{ErrorBody, FieldViolation, ViolationsBody};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("Payload validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new("Product not found")),
            )
                .into_response(),
            ProductError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ViolationsBody::new(violations)),
            )
                .into_response(),
            ProductError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
