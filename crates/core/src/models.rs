use serde::{Deserialize, Serialize};

/// A registered model: where its artifact lives and how it is described.
///
/// Paths are relative to the configured storage base directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Unique identifier, used in `/download/{id}` and `/metadata/{id}`
    pub id: String,

    /// Artifact file, relative to the base directory
    pub path: String,

    /// Sidecar JSON metadata file, relative to the base directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<String>,

    /// Content type sent with downloads
    #[serde(default = "default_content_type")]
    pub content_type: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            metadata_path: None,
            content_type: default_content_type(),
            description: String::new(),
            version: default_version(),
        }
    }

    pub fn with_metadata(mut self, metadata_path: impl Into<String>) -> Self {
        self.metadata_path = Some(metadata_path.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// The sample model shipped in the default configuration.
    pub fn iris_sample() -> Self {
        Self::new("iris-classifier-v1", "iris_classifier.pkl")
            .with_metadata("iris_classifier_metadata.json")
            .with_description("Iris Random Forest Classifier")
            .with_version("1.0")
    }
}
