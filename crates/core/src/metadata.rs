use serde_json::Value;

use crate::error::{Error, Result};
use crate::store::ArtifactStore;

/// Loads sidecar JSON metadata documents.
///
/// The document schema belongs to whatever produced the model; it is parsed
/// as a generic JSON tree and passed through untouched.
#[derive(Debug, Clone)]
pub struct MetadataLoader {
    store: ArtifactStore,
}

impl MetadataLoader {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// `Ok(None)` when the file does not exist, `Error::Parse` when it is not JSON.
    pub async fn load(&self, relative: &str) -> Result<Option<Value>> {
        let Some(bytes) = self.store.read(relative).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| Error::Parse {
                path: relative.into(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader(temp_dir: &TempDir) -> MetadataLoader {
        MetadataLoader::new(ArtifactStore::new(temp_dir.path()))
    }

    #[tokio::test]
    async fn test_load_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            temp_dir.path().join("meta.json"),
            r#"{"model_name": "Iris Random Forest Classifier", "classes": ["setosa", "versicolor", "virginica"], "accuracy": 1.0}"#,
        )
        .unwrap();

        let doc = loader(&temp_dir).load("meta.json").await.unwrap().expect("should load");
        assert_eq!(doc["model_name"], "Iris Random Forest Classifier");
        assert_eq!(doc["classes"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert!(loader(&temp_dir).load("absent.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_document_is_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("meta.json"), "{\"model_name\": ").unwrap();

        let result = loader(&temp_dir).load("meta.json").await;
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[tokio::test]
    async fn test_non_object_documents_pass_through() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("meta.json"), "[1, 2, 3]").unwrap();

        let doc = loader(&temp_dir).load("meta.json").await.unwrap().expect("should load");
        assert_eq!(doc, serde_json::json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_traversal_forbidden() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = loader(&temp_dir).load("../etc/passwd").await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }
}
