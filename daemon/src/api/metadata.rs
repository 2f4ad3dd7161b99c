//! `GET /metadata/{id}`
//!
//! Unauthenticated, like `/models`: it reports whether the artifact exists and
//! how large it is, but never returns its bytes. Downloads need the API key.
//!
//! An I/O fault while inspecting the artifact reports it as absent, as the
//! listing does. A path escaping the model directory is refused with 403.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Endpoints {
    pub download: String,
    pub metadata: String,
}

#[derive(Serialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub description: String,
    pub version: String,
    pub content_type: String,
    pub path: String,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
    pub endpoints: Endpoints,
    /// Sidecar document, passed through as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_metadata: Option<Value>,
}

pub async fn model_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ModelDescriptor>, ApiError> {
    let entry = state.registry.lookup(&id)?;
    let info = match state.store.stat(&entry.path).await {
        Ok(info) => info,
        Err(e @ modelhub_core::Error::Forbidden(_)) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(model = %entry.id, "Treating model as unavailable: {}", e);
            None
        }
    };

    let model_metadata = match &entry.metadata_path {
        Some(path) => load_sidecar(&state, &entry.id, path).await?,
        None => None,
    };

    Ok(Json(ModelDescriptor {
        id: entry.id.clone(),
        description: entry.description.clone(),
        version: entry.version.clone(),
        content_type: entry.content_type.clone(),
        path: entry.path.clone(),
        exists: info.is_some(),
        size_bytes: info.as_ref().map(|i| i.size_bytes),
        modified_at: info.and_then(|i| i.modified),
        endpoints: Endpoints {
            download: state.download_url(&entry.id),
            metadata: state.metadata_url(&entry.id),
        },
        model_metadata,
    }))
}

/// Metadata is decoration: an unreadable or malformed sidecar is logged and
/// left out. A path escaping the base directory still fails the request.
async fn load_sidecar(
    state: &AppState,
    model_id: &str,
    path: &str,
) -> Result<Option<Value>, ApiError> {
    match state.metadata.load(path).await {
        Ok(document) => Ok(document),
        Err(e @ modelhub_core::Error::Forbidden(_)) => Err(e.into()),
        Err(e) => {
            tracing::warn!(model = model_id, "Could not load metadata file: {}", e);
            Ok(None)
        }
    }
}
