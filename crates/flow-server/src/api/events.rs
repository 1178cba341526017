//! Event API endpoints.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use flow_core::models::Event;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::{self, AuthRejection};
use crate::api::{internal, not_found, validation_failed};
use crate::persistence::{events, firs};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub flight_information_region_id: String,
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    auth::require_region_manager(&user, &req.flight_information_region_id)?;

    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(flow_core::ValidationError {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        });
    }
    if req.date_end <= req.date_start {
        errors.push(flow_core::ValidationError {
            field: "date_end".to_string(),
            message: "End date must be after start date".to_string(),
        });
    }
    if !errors.is_empty() {
        return Err(validation_failed(errors));
    }

    if firs::load_fir(state.pool(), &req.flight_information_region_id)
        .await
        .map_err(internal)?
        .is_none()
    {
        return Err(not_found("Flight information region"));
    }

    let event = Event {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        date_start: req.date_start,
        date_end: req.date_end,
        flight_information_region_id: req.flight_information_region_id,
    };
    events::insert_event(state.pool(), &event)
        .await
        .map_err(internal)?;
    tracing::info!("Created event '{}' ({})", event.name, event.id);

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Event>>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    let events = events::list_events(state.pool()).await.map_err(internal)?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Event>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    events::load_event(state.pool(), &id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("Event"))
}
