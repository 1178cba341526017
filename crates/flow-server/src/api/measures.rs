//! Flow measure API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use flow_core::enums::FlowMeasureStatus;
use flow_core::message::NotificationMessage;
use flow_core::models::{FlowMeasure, FlowMeasureDraft, FlowMeasureUpdate, NotifiedRegion};
use flow_core::{validate_draft, validate_update};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::auth::{self, AuthRejection};
use crate::api::{internal, not_found, validation_failed};
use crate::notifier;
use crate::persistence::{events, firs, measures};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListMeasuresQuery {
    pub status: Option<FlowMeasureStatus>,
}

pub async fn create_measure(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<FlowMeasureDraft>,
) -> Result<(StatusCode, Json<FlowMeasure>), AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;
    auth::require_region_manager(&user, &draft.flight_information_region_id)?;

    let Some(fir) = firs::load_fir(state.pool(), &draft.flight_information_region_id)
        .await
        .map_err(internal)?
    else {
        return Err(not_found("Flight information region"));
    };

    let event = match &draft.event_id {
        Some(event_id) => Some(
            events::load_event(state.pool(), event_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| not_found("Event"))?,
        ),
        None => None,
    };

    let now = Utc::now();
    if let Err(errors) = validate_draft(&draft, event.as_ref(), now) {
        return Err(validation_failed(errors));
    }

    let mut notified_regions = Vec::with_capacity(draft.notified_flight_information_region_ids.len());
    for fir_id in &draft.notified_flight_information_region_ids {
        let Some(region) = firs::load_fir(state.pool(), fir_id)
            .await
            .map_err(internal)?
        else {
            return Err(not_found("Notified flight information region"));
        };
        let discord_tags = firs::load_tags_for_fir(state.pool(), fir_id)
            .await
            .map_err(internal)?;
        notified_regions.push(NotifiedRegion {
            region,
            discord_tags,
        });
    }

    // Identifier: owning region code plus a per-day, per-region sequence.
    let sequence = measures::count_for_fir_on_day(state.pool(), &fir.id, now)
        .await
        .map_err(internal)?;
    let identifier = format!("{}{:02}", fir.identifier, sequence + 1);

    let measure = FlowMeasure {
        id: Uuid::new_v4().to_string(),
        identifier,
        measure_type: draft.measure_type,
        status: FlowMeasureStatus::Notified,
        reason: draft.reason.trim().to_string(),
        start_time: draft.start_time,
        end_time: draft.end_time,
        value: draft.value,
        minutes: draft.minutes,
        seconds: draft.seconds,
        mandatory_route: draft.mandatory_route,
        additional_filters: draft.additional_filters,
        flight_information_region_id: draft.flight_information_region_id,
        event,
        user_id: user.id,
        notified_regions,
    };

    measures::insert_measure(state.pool(), &measure)
        .await
        .map_err(internal)?;
    tracing::info!("Created flow measure {} ({})", measure.identifier, measure.id);

    notifier::notify(
        state.discord(),
        &measure.identifier,
        &NotificationMessage::notified(&measure),
    )
    .await;

    Ok((StatusCode::CREATED, Json(measure)))
}

pub async fn list_measures(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListMeasuresQuery>,
) -> Result<Json<Vec<FlowMeasure>>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    let measures = measures::list_measures(state.pool(), query.status)
        .await
        .map_err(internal)?;
    Ok(Json(measures))
}

pub async fn get_measure(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<FlowMeasure>, AuthRejection> {
    auth::require_panel_user(&state, &headers).await?;
    measures::load_measure(state.pool(), &id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or_else(|| not_found("Flow measure"))
}

pub async fn update_measure(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<FlowMeasureUpdate>,
) -> Result<Json<FlowMeasure>, AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;

    let Some(measure) = measures::load_measure(state.pool(), &id)
        .await
        .map_err(internal)?
    else {
        return Err(not_found("Flow measure"));
    };
    auth::require_region_manager(&user, &measure.flight_information_region_id)?;

    if let Err(errors) = validate_update(&measure, &update, Utc::now()) {
        return Err(validation_failed(errors));
    }

    for fir_id in &update.notified_flight_information_region_ids {
        if firs::load_fir(state.pool(), fir_id)
            .await
            .map_err(internal)?
            .is_none()
        {
            return Err(not_found("Notified flight information region"));
        }
    }

    measures::update_editable(state.pool(), &id, &update)
        .await
        .map_err(internal)?;

    let updated = measures::load_measure(state.pool(), &id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found("Flow measure"))?;
    tracing::info!("Updated flow measure {}", updated.identifier);

    Ok(Json(updated))
}

pub async fn withdraw_measure(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<FlowMeasure>, AuthRejection> {
    let user = auth::require_panel_user(&state, &headers).await?;

    let Some(mut measure) = measures::load_measure(state.pool(), &id)
        .await
        .map_err(internal)?
    else {
        return Err(not_found("Flow measure"));
    };
    auth::require_region_manager(&user, &measure.flight_information_region_id)?;

    if !measure.status.is_withdrawable() {
        return Err((
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "Only notified or active measures can be withdrawn",
                "status": measure.status
            })),
        ));
    }

    measures::update_status(state.pool(), &id, FlowMeasureStatus::Withdrawn)
        .await
        .map_err(internal)?;
    measure.status = FlowMeasureStatus::Withdrawn;
    tracing::info!("Withdrew flow measure {}", measure.identifier);

    notifier::notify(
        state.discord(),
        &measure.identifier,
        &NotificationMessage::withdrawn(&measure),
    )
    .await;

    Ok(Json(measure))
}
