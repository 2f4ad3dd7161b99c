use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "ML Model HTTP Server";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub available_models: usize,
    pub version: &'static str,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        available_models: state.registry.len(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
