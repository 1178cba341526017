//! API routes for the flow measure admin service.

pub mod auth;
pub mod events;
pub mod firs;
pub mod measures;
mod routes;
pub mod users;

use axum::http::StatusCode;
use axum::{Json, Router};

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

pub(crate) fn internal(err: anyhow::Error) -> (StatusCode, Json<serde_json::Value>) {
    tracing::error!("Storage failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Storage failure"})),
    )
}

pub(crate) fn not_found(entity: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("{} not found", entity)})),
    )
}

/// Field-scoped validation failures as a 422 response.
pub(crate) fn validation_failed(
    errors: Vec<flow_core::ValidationError>,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "errors": errors })),
    )
}

#[cfg(test)]
mod tests;
