use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::loops::advance_lifecycle;
use crate::{api, config::Config, persistence, state::AppState};

const SYSTEM_TOKEN: &str = "test-system-token";

async fn setup_app() -> (axum::Router, Arc<AppState>) {
    let mut config = Config::from_env();
    config.database_path = std::env::temp_dir()
        .join(format!("flow-test-{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string();
    config.system_token = SYSTEM_TOKEN.to_string();
    config.discord_webhook_url = String::new();

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await
        .expect("init db");
    let state = Arc::new(AppState::new(db, config));
    state.load_from_database().await.expect("load db");

    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn create_fir(app: &axum::Router, identifier: &str, name: &str) -> String {
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/firs",
            SYSTEM_TOKEN,
            json!({"identifier": identifier, "name": name}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    read_json(res).await["id"].as_str().unwrap().to_string()
}

fn measure_draft(fir_id: &str) -> Value {
    let now = Utc::now();
    json!({
        "type": "minimum_departure_interval",
        "reason": "Capacity constraints",
        "start_time": (now + Duration::hours(1)).to_rfc3339(),
        "end_time": (now + Duration::hours(3)).to_rfc3339(),
        "minutes": 2,
        "seconds": 30,
        "flight_information_region_id": fir_id,
    })
}

#[tokio::test]
async fn rejects_missing_and_invalid_tokens() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/v1/flow-measures")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(get_request("/v1/flow-measures", "not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn me_resolves_system_user() {
    let (app, _state) = setup_app().await;

    let res = app
        .clone()
        .oneshot(get_request("/v1/users/me", SYSTEM_TOKEN))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["role"], "system");
}

#[tokio::test]
async fn create_measure_assigns_identifier_and_status() {
    let (app, _state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            measure_draft(&fir_id),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["identifier"], "EGTT01");
    assert_eq!(body["status"], "notified");

    // Second measure the same day gets the next sequence number.
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            measure_draft(&fir_id),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(read_json(res).await["identifier"], "EGTT02");
}

#[tokio::test]
async fn create_measure_reports_field_errors() {
    let (app, _state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;

    let now = Utc::now();
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            json!({
                "type": "level_cap",
                "reason": "",
                "start_time": (now - Duration::hours(1)).to_rfc3339(),
                "end_time": (now + Duration::hours(1)).to_rfc3339(),
                "flight_information_region_id": fir_id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(res).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"reason"));
    assert!(fields.contains(&"value"));
    assert!(fields.contains(&"start_time"));
}

#[tokio::test]
async fn flow_manager_scoped_to_assigned_regions() {
    let (app, _state) = setup_app().await;
    let home_fir = create_fir(&app, "EGTT", "London").await;
    let other_fir = create_fir(&app, "EHAA", "Amsterdam").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/users",
            SYSTEM_TOKEN,
            json!({
                "name": "Flow Manager",
                "role": "flow_manager",
                "flight_information_region_ids": [home_fir],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    let token = body["api_token"].as_str().unwrap().to_string();

    // In scope.
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            &token,
            measure_draft(&home_fir),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Out of scope.
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            &token,
            measure_draft(&other_fir),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Region listing only shows the assigned region.
    let res = app
        .clone()
        .oneshot(get_request("/v1/firs", &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let firs = read_json(res).await;
    assert_eq!(firs.as_array().unwrap().len(), 1);
    assert_eq!(firs[0]["identifier"], "EGTT");

    // Only System/NMT may create users.
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/users",
            &token,
            json!({"name": "Another", "role": "user"}),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_replaces_notified_region_set() {
    let (app, _state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;
    let notified_a = create_fir(&app, "EHAA", "Amsterdam").await;
    let notified_b = create_fir(&app, "EBBU", "Brussels").await;

    let mut draft = measure_draft(&fir_id);
    draft["notified_flight_information_region_ids"] = json!([notified_a]);
    let res = app
        .clone()
        .oneshot(request("POST", "/v1/flow-measures", SYSTEM_TOKEN, draft))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = read_json(res).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["notified_regions"].as_array().unwrap().len(), 1);

    let update = json!({
        "reason": "Capacity constraints, revised",
        "end_time": (Utc::now() + Duration::hours(4)).to_rfc3339(),
        "minutes": 3,
        "seconds": 0,
        "notified_flight_information_region_ids": [notified_b],
    });
    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/v1/flow-measures/{}", id),
            SYSTEM_TOKEN,
            update,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let updated = read_json(res).await;
    assert_eq!(updated["reason"], "Capacity constraints, revised");
    let notified = updated["notified_regions"].as_array().unwrap();
    assert_eq!(notified.len(), 1);
    assert_eq!(notified[0]["region"]["identifier"], "EBBU");
}

#[tokio::test]
async fn withdraw_is_not_repeatable() {
    let (app, _state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            measure_draft(&fir_id),
        ))
        .await
        .unwrap();
    let id = read_json(res).await["id"].as_str().unwrap().to_string();

    let withdraw_uri = format!("/v1/flow-measures/{}/withdraw", id);
    let res = app
        .clone()
        .oneshot(request("POST", &withdraw_uri, SYSTEM_TOKEN, json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await["status"], "withdrawn");

    let res = app
        .clone()
        .oneshot(request("POST", &withdraw_uri, SYSTEM_TOKEN, json!({})))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn lifecycle_activates_then_expires() {
    let (app, state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            measure_draft(&fir_id),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    let id = body["id"].as_str().unwrap().to_string();
    let start_time: chrono::DateTime<Utc> =
        body["start_time"].as_str().unwrap().parse().unwrap();
    let end_time: chrono::DateTime<Utc> = body["end_time"].as_str().unwrap().parse().unwrap();

    // Before the start time, nothing moves.
    advance_lifecycle(&state, start_time - Duration::minutes(1))
        .await
        .unwrap();
    let res = app
        .clone()
        .oneshot(get_request(&format!("/v1/flow-measures/{}", id), SYSTEM_TOKEN))
        .await
        .unwrap();
    assert_eq!(read_json(res).await["status"], "notified");

    // Inside the window, the measure activates.
    advance_lifecycle(&state, start_time + Duration::minutes(1))
        .await
        .unwrap();
    let res = app
        .clone()
        .oneshot(get_request(&format!("/v1/flow-measures/{}", id), SYSTEM_TOKEN))
        .await
        .unwrap();
    assert_eq!(read_json(res).await["status"], "active");

    // Past the end time, it expires.
    advance_lifecycle(&state, end_time + Duration::minutes(1))
        .await
        .unwrap();
    let res = app
        .clone()
        .oneshot(get_request(&format!("/v1/flow-measures/{}", id), SYSTEM_TOKEN))
        .await
        .unwrap();
    assert_eq!(read_json(res).await["status"], "expired");

    // Expired measures no longer appear in an active-only listing.
    let res = app
        .clone()
        .oneshot(get_request("/v1/flow-measures?status=active", SYSTEM_TOKEN))
        .await
        .unwrap();
    assert!(read_json(res).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn skipped_activation_expires_directly() {
    let (app, state) = setup_app().await;
    let fir_id = create_fir(&app, "EGTT", "London").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/flow-measures",
            SYSTEM_TOKEN,
            measure_draft(&fir_id),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    let id = body["id"].as_str().unwrap().to_string();
    let end_time: chrono::DateTime<Utc> = body["end_time"].as_str().unwrap().parse().unwrap();

    // A pass that lands after the end time takes the measure straight from
    // notified to expired, never through active.
    advance_lifecycle(&state, end_time + Duration::minutes(1))
        .await
        .unwrap();
    let res = app
        .clone()
        .oneshot(get_request(&format!("/v1/flow-measures/{}", id), SYSTEM_TOKEN))
        .await
        .unwrap();
    assert_eq!(read_json(res).await["status"], "expired");
}

#[tokio::test]
async fn event_must_belong_to_measure_region() {
    let (app, _state) = setup_app().await;
    let fir_a = create_fir(&app, "EGTT", "London").await;
    let fir_b = create_fir(&app, "EHAA", "Amsterdam").await;

    let now = Utc::now();
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/v1/events",
            SYSTEM_TOKEN,
            json!({
                "name": "Cross the Pond",
                "date_start": (now + Duration::hours(1)).to_rfc3339(),
                "date_end": (now + Duration::hours(6)).to_rfc3339(),
                "flight_information_region_id": fir_b,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let event_id = read_json(res).await["id"].as_str().unwrap().to_string();

    let mut draft = measure_draft(&fir_a);
    draft["event_id"] = json!(event_id);
    let res = app
        .clone()
        .oneshot(request("POST", "/v1/flow-measures", SYSTEM_TOKEN, draft))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(res).await;
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == "event_id"));
}
