#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use modelhub_core::{Config, ModelEntry};
use modelhub_daemon::{api, AppState};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key-0123456789";
pub const IRIS_ID: &str = "iris-classifier-v1";
pub const IRIS_FILE: &str = "iris_classifier.pkl";
pub const IRIS_METADATA_FILE: &str = "iris_classifier_metadata.json";
pub const IRIS_SIZE: usize = 900_000;

/// A temporary model directory plus a server state pointing at it.
///
/// Layout:
/// ```text
/// <tmp>/
///   outside-secret.bin        # must never be served
///   models/                   # storage.base_path
///     iris_classifier.pkl
///     iris_classifier_metadata.json
/// ```
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
    pub state: Arc<AppState>,
}

impl Fixture {
    pub fn iris() -> Self {
        Self::with_models(vec![ModelEntry::iris_sample()])
    }

    pub fn with_models(models: Vec<ModelEntry>) -> Self {
        Self::build(models, |_| {})
    }

    pub fn build(models: Vec<ModelEntry>, customize: impl FnOnce(&mut Config)) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let base = dir.path().join("models");
        fs::create_dir(&base).expect("Failed to create models dir");

        fs::write(base.join(IRIS_FILE), iris_bytes()).expect("Failed to write artifact");
        fs::write(
            base.join(IRIS_METADATA_FILE),
            r#"{
                "model_name": "Iris Random Forest Classifier",
                "model_type": "RandomForestClassifier",
                "framework": "scikit-learn",
                "num_classes": 3,
                "classes": ["setosa", "versicolor", "virginica"],
                "input_features": [{"name": "sepal length (cm)", "type": "float"}]
            }"#,
        )
        .expect("Failed to write metadata");
        fs::write(dir.path().join("outside-secret.bin"), b"TOP-SECRET-OUTSIDE-BYTES")
            .expect("Failed to write secret");

        let mut config = Config::default();
        config.server.port = 8080;
        config.auth.api_key = API_KEY.to_string();
        config.storage.base_path = base;
        config.registry.models = models;
        customize(&mut config);

        let state = Arc::new(AppState::new(&config).expect("Failed to build state"));

        Self { dir, config, state }
    }

    pub fn base(&self) -> PathBuf {
        self.config.storage.base_path.clone()
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn app(&self) -> Router {
        api::app(self.state.clone())
    }

    pub async fn get(&self, uri: &str) -> Reply {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_with(&self, uri: &str, header: &str, value: &str) -> Reply {
        self.request(
            Request::get(uri)
                .header(header, value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn request(&self, request: Request<Body>) -> Reply {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Reply {
            status,
            headers,
            body,
        }
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "body is not JSON ({}): {}",
                e,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Deterministic, non-repeating-looking artifact contents
pub fn iris_bytes() -> Vec<u8> {
    (0..IRIS_SIZE).map(|i| (i % 251) as u8).collect()
}
