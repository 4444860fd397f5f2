//! Route handlers for the recall server

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use recall_charts::ChartKind;
use recall_core::{RecallTable, VehicleIdentification};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::page;
use crate::state::AppState;

type Result<T> = std::result::Result<T, AppError>;

// ============== Request helpers ==============

/// Parse a request body as JSON without extractor-specific rejections
fn parse_json(body: &Bytes) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Request body is not valid JSON: {e}")))
}

fn parse_object(body: &Bytes) -> Result<Map<String, Value>> {
    match parse_json(body)? {
        Value::Object(obj) => Ok(obj),
        _ => Err(recall_core::Error::NotAnObject.into()),
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{field}' in request body")))
}

/// Vehicle named in the request, else the stored one
async fn resolve_vehicle(state: &AppState, obj: &Map<String, Value>) -> Result<VehicleIdentification> {
    match VehicleIdentification::from_optional_fields(obj)? {
        Some(vehicle) => Ok(vehicle),
        None => Ok(state.store.load().await?),
    }
}

async fn recall_table(state: &AppState, obj: &Map<String, Value>) -> Result<RecallTable> {
    let vehicle = resolve_vehicle(state, obj).await?;
    let table = state.recalls.fetch_table(&vehicle).await?;
    tracing::debug!(
        vehicle = %vehicle,
        source = state.recalls.name(),
        rows = table.len(),
        "Loaded recall table"
    );
    Ok(table)
}

// ============== Recall API ==============

/// Save the selected vehicle
pub async fn get_vehicle_data(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let value = parse_json(&body)?;
    let vehicle = state.store.save_json(&value).await?;
    tracing::info!(vehicle = %vehicle, "Saved vehicle selection");

    Ok(Json(json!({ "message": "Data saved successfully" })))
}

/// Render one chart as PNG
pub async fn get_chart(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    let obj = parse_object(&body)?;
    let kind: ChartKind = required_str(&obj, "chart_type")?.parse()?;

    let table = recall_table(&state, &obj).await?;
    let renderer = state.charts;
    let png = tokio::task::spawn_blocking(move || renderer.render_png(kind, &table)).await??;

    tracing::info!(chart = %kind, bytes = png.len(), "Served chart");
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Answer a question about the vehicle's recalls
pub async fn chatbot(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let obj = parse_object(&body)?;
    let message = required_str(&obj, "message")?;

    let table = recall_table(&state, &obj).await?;
    let prompt = recall_gemini::build_prompt(&table, message);
    let response = state.chatbot.generate(&prompt).await?;

    tracing::info!(generator = state.chatbot.name(), rows = table.len(), "Answered chatbot question");
    Ok(Json(json!({ "response": response })))
}

// ============== Info ==============

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "recall-web",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "recall_source": state.recalls.name(),
        "vehicle_stored": state.store.exists().await,
    }))
}

/// Available chart types
pub async fn list_charts() -> impl IntoResponse {
    let charts: Vec<Value> = ChartKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "id": kind.as_str(),
                "title": kind.title(),
                "description": kind.description(),
            })
        })
        .collect();
    Json(json!({ "charts": charts }))
}

/// Index page
pub async fn index() -> impl IntoResponse {
    Html(page::index_html())
}
