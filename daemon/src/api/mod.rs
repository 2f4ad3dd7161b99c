pub mod download;
pub mod error;
pub mod health;
pub mod metadata;
pub mod models;
pub mod render;

use axum::{
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::AppState;

pub const ENDPOINTS: [&str; 4] = [
    "GET /health",
    "GET /models",
    "GET /download/{model_id}",
    "GET /metadata/{model_id}",
];

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", only_get(get(health::health)))
        .route("/models", only_get(get(models::list_models)))
        .route("/metadata/:id", only_get(get(metadata::model_metadata)))
        .route("/download/", only_get(get(download::download_without_id)))
        .route("/download/*id", only_get(get(download::download_model)))
        .fallback(not_found)
        .with_state(state)
}

/// The full service: routes plus CORS, preflight handling and request tracing
pub fn app(state: Arc<AppState>) -> Router {
    routes(state)
        .layer(render::cors_layer())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(render::ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(render::ALLOW_HEADERS),
        ))
        .layer(middleware::from_fn(render::preflight_no_content))
        .layer(TraceLayer::new_for_http())
}

fn only_get(route: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    route.fallback(method_not_allowed)
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "kind": "route_not_found",
            "message": "No such endpoint",
            "available_endpoints": ENDPOINTS,
        })),
    )
        .into_response()
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method Not Allowed",
            "kind": "method_not_allowed",
            "message": "Only GET is supported on this endpoint",
            "available_endpoints": ENDPOINTS,
        })),
    )
        .into_response()
}
