//! # recall-web
//!
//! HTTP front for recall-lens. A user picks a vehicle, then asks for charts
//! or chatbot answers computed from that vehicle's NHTSA recalls.
//!
//! - `POST /get_vehicle_data` stores the selection
//! - `POST /get_chart` renders one of eight charts as PNG
//! - `POST /chatbot` answers a question with Gemini
//!
//! Chart and chatbot requests may name their own vehicle; otherwise the
//! stored selection is used.

pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/get_vehicle_data", post(handlers::get_vehicle_data))
        .route("/get_chart", post(handlers::get_chart))
        .route("/chatbot", post(handlers::chatbot))
        .route("/api/health", get(handlers::health))
        .route("/api/charts", get(handlers::list_charts))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("recall-web listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
