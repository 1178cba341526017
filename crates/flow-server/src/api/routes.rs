//! REST API routes.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::{events, firs, measures, users};
use crate::state::AppState;

/// Create the API router. Every route authenticates inside its handler, so
/// the whole surface shares one router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/firs", post(firs::create_fir))
        .route("/v1/firs", get(firs::list_firs))
        .route("/v1/firs/:id", get(firs::get_fir))
        .route("/v1/firs/:id/discord-tags", post(firs::create_discord_tag))
        .route("/v1/firs/:id/discord-tags", get(firs::list_discord_tags))
        .route("/v1/events", post(events::create_event))
        .route("/v1/events", get(events::list_events))
        .route("/v1/events/:id", get(events::get_event))
        .route("/v1/users", post(users::create_user))
        .route("/v1/users/me", get(users::me))
        .route("/v1/flow-measures", post(measures::create_measure))
        .route("/v1/flow-measures", get(measures::list_measures))
        .route("/v1/flow-measures/:id", get(measures::get_measure))
        .route("/v1/flow-measures/:id", put(measures::update_measure))
        .route(
            "/v1/flow-measures/:id/withdraw",
            post(measures::withdraw_measure),
        )
}
