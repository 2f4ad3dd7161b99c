use anyhow::Result;
use modelhub_core::{ArtifactStore, Config, MetadataLoader, ModelRegistry};

use crate::auth::Authenticator;

/// Everything a request handler needs. Built once at startup and shared
/// read-only, so handlers never take a lock.
#[derive(Debug)]
pub struct AppState {
    pub registry: ModelRegistry,
    pub store: ArtifactStore,
    pub metadata: MetadataLoader,
    pub auth: Authenticator,
    public_url: String,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let registry = ModelRegistry::from_config(config)?;
        let store = ArtifactStore::new(&config.storage.base_path);

        Ok(Self {
            registry,
            metadata: MetadataLoader::new(store.clone()),
            store,
            auth: Authenticator::new(config.auth.api_key.clone()),
            public_url: config.public_url(),
        })
    }

    pub fn download_url(&self, model_id: &str) -> String {
        format!("{}/download/{}", self.public_url, model_id)
    }

    pub fn metadata_url(&self, model_id: &str) -> String {
        format!("{}/metadata/{}", self.public_url, model_id)
    }

    /// Log which registered artifacts are present on disk
    pub async fn log_inventory(&self) {
        tracing::info!(
            "Serving {} model(s) from {}",
            self.registry.len(),
            self.store.base_dir().display()
        );

        for model in self.registry.list() {
            match self.store.stat(&model.path).await {
                Ok(Some(info)) => tracing::info!(
                    model = %model.id,
                    path = %model.path,
                    size_bytes = info.size_bytes,
                    "Model available at {}",
                    self.download_url(&model.id)
                ),
                Ok(None) => tracing::warn!(
                    model = %model.id,
                    path = %model.path,
                    "Model file not found"
                ),
                Err(e) => tracing::warn!(
                    model = %model.id,
                    path = %model.path,
                    "Model file unusable: {}",
                    e
                ),
            }
        }
    }
}
