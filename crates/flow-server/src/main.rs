//! Flow measure server - admin API and notification backend.

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flow_server::config::Config;
use flow_server::persistence::init_database;
use flow_server::state::AppState;
use flow_server::{api, loops};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flow_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting flow measure server...");

    let config = Config::from_env();
    let port = config.server_port;

    let db = init_database(&config.database_path, config.database_max_connections).await?;
    let state = Arc::new(AppState::new(db, config));
    state.load_from_database().await?;

    let (shutdown_tx, _) = tokio::sync::broadcast::channel(1);
    tokio::spawn(loops::run_lifecycle_loop(
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    drop(shutdown_tx);

    Ok(())
}
