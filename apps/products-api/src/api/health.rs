//! Liveness endpoints

use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "time": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

async fn ping() -> Json<Value> {
    Json(json!({ "pong": true }))
}

/// Root-level health probe, outside the `/api` prefix.
pub fn root_router() -> Router {
    Router::new().route("/healthz", get(healthz))
}

/// Readiness ping served under `/api`.
pub fn api_router() -> Router {
    Router::new().route("/ping", get(ping))
}
