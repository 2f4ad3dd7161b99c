use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the registry, the artifact store and the metadata loader.
///
/// "Absent" is not an error here: a missing artifact or sidecar file is
/// reported as `Ok(None)` by the store and the loader.
#[derive(Debug, Error)]
pub enum Error {
    /// The identifier is not in the registry
    #[error("Model '{0}' not found")]
    NotFound(String),

    /// A relative path resolved outside the base directory
    #[error("Path '{0}' resolves outside the model directory")]
    Forbidden(String),

    /// A sidecar metadata file is not valid JSON
    #[error("Invalid metadata in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model '{0}' is registered more than once")]
    DuplicateModel(String),

    #[error("Invalid registry entry: {0}")]
    InvalidEntry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
