use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

use super::{error::ApiError, render};
use crate::auth::RequireApiKey;
use crate::state::AppState;

/// `GET /download/{id}`: the artifact bytes, streamed from disk.
///
/// The key is checked before the id, so an unauthenticated caller learns
/// nothing about which models exist. The route captures the rest of the path,
/// so `/download/a/b` is authenticated too and then fails the lookup.
pub async fn download_model(
    _auth: RequireApiKey,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let entry = state.registry.lookup(&id)?;

    let Some(artifact) = state.store.open(&entry.path).await? else {
        return Err(ApiError::FileMissing(entry.path.clone()));
    };

    tracing::info!(
        model = %entry.id,
        bytes = artifact.info.size_bytes,
        "Serving download"
    );

    render::attachment(artifact, &entry.content_type)
}

/// `GET /download/` with no id: still authenticated first, then not found.
pub async fn download_without_id(_auth: RequireApiKey) -> ApiError {
    ApiError::NotFound(String::new())
}
