//! Flight information region API endpoints.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use flow_core::models::{DiscordTag, FlightInformationRegion};
use flow_core::policy;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::{self, AuthRejection};
use crate::api::{internal, not_found};
use crate::persistence::firs;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFirRequest {
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDiscordTagRequest {
    pub tag: String,
}

pub async fn create_fir(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateFirRequest>,
) -> Result<(StatusCode, Json<FlightInformationRegion>), AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    auth::require_all_region_manager(&user)?;

    if req.identifier.trim().is_empty() || req.name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "errors": [{"field": "identifier", "message": "Identifier and name are required"}]
            })),
        ));
    }

    if firs::find_by_identifier(state.pool(), &req.identifier)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err((
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "Identifier already exists"})),
        ));
    }

    let fir = FlightInformationRegion {
        id: Uuid::new_v4().to_string(),
        identifier: req.identifier.trim().to_uppercase(),
        name: req.name.trim().to_string(),
    };
    firs::insert_fir(state.pool(), &fir).await.map_err(internal)?;
    tracing::info!("Created flight information region {}", fir.identifier);

    Ok((StatusCode::CREATED, Json(fir)))
}

/// List the regions visible to the caller per the access policy.
pub async fn list_firs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<FlightInformationRegion>>, AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    let all = firs::list_firs(state.pool()).await.map_err(internal)?;
    Ok(Json(policy::visible_regions(&user, &all)))
}

pub async fn get_fir(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<FlightInformationRegion>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    firs::load_fir(state.pool(), &id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("Flight information region"))
}

pub async fn create_discord_tag(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<CreateDiscordTagRequest>,
) -> Result<(StatusCode, Json<DiscordTag>), AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    auth::require_all_region_manager(&user)?;

    if firs::load_fir(state.pool(), &id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err(not_found("Flight information region"));
    }

    let tag = DiscordTag {
        id: Uuid::new_v4().to_string(),
        flight_information_region_id: id,
        tag: req.tag,
    };
    firs::insert_discord_tag(state.pool(), &tag)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn list_discord_tags(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<DiscordTag>>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    let tags = firs::load_tags_for_fir(state.pool(), &id)
        .await
        .map_err(internal)?;
    Ok(Json(tags))
}
