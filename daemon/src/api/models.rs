use axum::{extract::State, Json};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub description: String,
    pub version: String,
    pub content_type: String,
    pub available: bool,
    pub size_bytes: Option<u64>,
    pub download_url: String,
}

/// Summaries keyed by model id, serialized as a JSON object in registration order
pub struct ModelIndex(pub Vec<ModelSummary>);

impl Serialize for ModelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for summary in &self.0 {
            map.serialize_entry(&summary.id, summary)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: ModelIndex,
    pub total: usize,
}

/// Describe every registered model. Never returns artifact bytes, so no key is needed.
///
/// One bad entry never fails the listing: I/O faults and path escapes both
/// mark that model unavailable.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let mut models = Vec::with_capacity(state.registry.len());

    for entry in state.registry.list() {
        let info = match state.store.stat(&entry.path).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(model = %entry.id, "Treating model as unavailable: {}", e);
                None
            }
        };

        models.push(ModelSummary {
            id: entry.id.clone(),
            description: entry.description.clone(),
            version: entry.version.clone(),
            content_type: entry.content_type.clone(),
            available: info.is_some(),
            size_bytes: info.map(|i| i.size_bytes),
            download_url: state.download_url(&entry.id),
        });
    }

    let total = models.len();
    Json(ModelsResponse {
        models: ModelIndex(models),
        total,
    })
}
