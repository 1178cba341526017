//! User management API endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use flow_core::enums::RoleKey;
use flow_core::models::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::{self, AuthRejection};
use crate::api::{internal, not_found, validation_failed};
use crate::persistence::{firs, users};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub role: RoleKey,
    #[serde(default)]
    pub flight_information_region_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: User,
    /// Bearer token for the new user. Returned once, on creation.
    pub api_token: String,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AuthRejection> {
    let caller = auth::require_panel_user(&state, &headers).await?;
    auth::require_all_region_manager(&caller)?;

    if req.name.trim().is_empty() {
        return Err(validation_failed(vec![flow_core::ValidationError {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        }]));
    }

    for fir_id in &req.flight_information_region_ids {
        if firs::load_fir(state.pool(), fir_id)
            .await
            .map_err(internal)?
            .is_none()
        {
            return Err(not_found("Flight information region"));
        }
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        role: req.role,
        flight_information_region_ids: req.flight_information_region_ids,
    };
    let api_token = Uuid::new_v4().to_string();

    users::insert_user(state.pool(), &user, &api_token)
        .await
        .map_err(internal)?;
    state.register_token(&api_token, &user.id);
    tracing::info!("Created user '{}' with role {:?}", user.name, user.role);

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse { user, api_token }),
    ))
}

/// The calling user, as resolved from the bearer token.
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<User>, AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    Ok(Json(user))
}
