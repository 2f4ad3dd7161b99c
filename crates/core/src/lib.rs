//! modelhub_core - Core library for serving model artifacts
//!
//! This crate provides:
//! - Configuration loading (TOML)
//! - The model registry (identifier -> artifact location)
//! - Filesystem access to artifacts, confined to a base directory
//! - Sidecar metadata loading

pub mod config;
pub mod error;
pub mod metadata;
pub mod models;
pub mod registry;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use metadata::MetadataLoader;
pub use models::ModelEntry;
pub use registry::ModelRegistry;
pub use store::{Artifact, ArtifactInfo, ArtifactStore};
