//! Bearer-token authentication for the admin API.

use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use flow_core::models::User;
use flow_core::policy;

use crate::persistence::users::{self, SYSTEM_USER_ID};
use crate::state::AppState;

pub type AuthRejection = (StatusCode, Json<serde_json::Value>);

/// Extract the bearer token from the Authorization header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?;
    let text = value.to_str().ok()?;
    let token = text.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolve the calling user and require panel access.
///
/// The configured system token authenticates as the built-in system user;
/// any other token is looked up against registered user tokens. Role and
/// region scoping are re-read on every call, never cached.
pub async fn require_panel_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, AuthRejection> {
    let token = extract_token(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Authorization required",
                "hint": "Add header: Authorization: Bearer <token>"
            })),
        )
    })?;

    let system_token = &state.config().system_token;
    let user_id = if !system_token.is_empty() && token == *system_token {
        SYSTEM_USER_ID.to_string()
    } else {
        state.user_id_for_token(&token).ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({"error": "Invalid token"})),
            )
        })?
    };

    let user = users::load_user(state.pool(), &user_id)
        .await
        .map_err(|err| {
            tracing::error!("Failed to load user {}: {}", user_id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to load user"})),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({"error": "Unknown user"})),
            )
        })?;

    if !policy::can_access_panel(&user) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({"error": "Role does not grant panel access"})),
        ));
    }

    Ok(user)
}

/// Require a user whose role manages every region (System or NMT).
pub fn require_all_region_manager(user: &User) -> Result<(), AuthRejection> {
    if policy::has_capability(user.role, policy::Capability::ManageAllRegions) {
        return Ok(());
    }
    Err((
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({
            "error": "Requires a System or NMT role"
        })),
    ))
}

/// Require that the user may manage the given region.
pub fn require_region_manager(user: &User, region_id: &str) -> Result<(), AuthRejection> {
    if policy::can_manage_region(user, region_id) {
        return Ok(());
    }
    Err((
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({
            "error": "Region is outside your management scope",
            "flight_information_region_id": region_id
        })),
    ))
}
