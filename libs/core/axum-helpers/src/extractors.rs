//! Strict JSON body extractor.

use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::errors::ErrorBody;

/// JSON extractor that maps every body rejection to
/// `400 {"error": "Invalid JSON"}`.
///
/// A body that is missing, not syntactically valid JSON, or not
/// deserializable into `T` (wrong field types) is malformed input for
/// this API; constraint violations on well-typed payloads are reported
/// separately with 422.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e.body_text());
            (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorBody::new("Invalid JSON")),
            )
                .into_response()
        })?;

        Ok(JsonBody(data))
    }
}
