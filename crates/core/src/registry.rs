use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::ModelEntry;

/// The set of servable models, fixed once the server starts.
///
/// Entries keep their registration order; `list()` returns them in that order.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<ModelEntry>,
    index: HashMap<String, usize>,
}

/// On-disk registry document
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistryFile {
    pub models: Vec<ModelEntry>,
}

impl ModelRegistry {
    pub fn from_entries(models: Vec<ModelEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(models.len());

        for (position, model) in models.iter().enumerate() {
            if model.id.trim().is_empty() {
                return Err(Error::InvalidEntry("model id must not be empty".to_string()));
            }
            if model.path.trim().is_empty() {
                return Err(Error::InvalidEntry(format!(
                    "model '{}' has an empty path",
                    model.id
                )));
            }
            if index.insert(model.id.clone(), position).is_some() {
                return Err(Error::DuplicateModel(model.id.clone()));
            }
        }

        Ok(Self { models, index })
    }

    /// Build the registry from a JSON registry file when configured, else
    /// from the inline `[[registry.models]]` entries.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        match &config.registry.file {
            Some(path) => Self::load_file(path),
            None => Ok(Self::from_entries(config.registry.models.clone())?),
        }
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&content)
            .with_context(|| format!("Invalid registry {}", path.display()))?;
        Ok(Self::from_entries(file.models)?)
    }

    pub fn lookup(&self, id: &str) -> Result<&ModelEntry> {
        self.index
            .get(id)
            .map(|&position| &self.models[position])
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn list(&self) -> &[ModelEntry] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries() -> Vec<ModelEntry> {
        vec![
            ModelEntry::new("zeta", "z.bin"),
            ModelEntry::new("alpha", "a.bin"),
            ModelEntry::new("mid", "m.bin"),
        ]
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let registry = ModelRegistry::from_entries(entries()).unwrap();
        let ids: Vec<_> = registry.list().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let registry = ModelRegistry::from_entries(entries()).unwrap();
        assert_eq!(registry.lookup("alpha").unwrap().path, "a.bin");
        assert!(matches!(registry.lookup("nope"), Err(Error::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut models = entries();
        models.push(ModelEntry::new("alpha", "other.bin"));
        assert!(matches!(
            ModelRegistry::from_entries(models),
            Err(Error::DuplicateModel(id)) if id == "alpha"
        ));
    }

    #[test]
    fn test_empty_id_or_path_rejected() {
        assert!(matches!(
            ModelRegistry::from_entries(vec![ModelEntry::new(" ", "x.bin")]),
            Err(Error::InvalidEntry(_))
        ));
        assert!(matches!(
            ModelRegistry::from_entries(vec![ModelEntry::new("x", "")]),
            Err(Error::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ModelRegistry::from_entries(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_from_config_inline() {
        let registry = ModelRegistry::from_config(&Config::default()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("iris-classifier-v1").is_ok());
    }

    #[test]
    fn test_from_config_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("registry.json");
        fs::write(
            &path,
            r#"{"models": [
                {"id": "lgbm-classifier-1", "path": "lgbm/LGBM_Classifier_1.pkl",
                 "description": "LGBM Classifier Model v1"}
            ]}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.registry.file = Some(path);

        let registry = ModelRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("iris-classifier-v1").is_err());
        assert_eq!(
            registry.lookup("lgbm-classifier-1").unwrap().description,
            "LGBM Classifier Model v1"
        );
    }

    #[test]
    fn test_load_file_invalid_json() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("registry.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ModelRegistry::load_file(&path).is_err());
    }
}
