//! Filesystem access to model artifacts.
//!
//! Every path handed to the store is relative to a single base directory, and
//! the resolved location must stay inside it:
//! 1. Lexically: absolute paths, drive prefixes and `..` segments are refused.
//! 2. Physically: when the target exists, its canonical path (symlinks
//!    resolved) must start with the canonical base directory.
//!
//! Nothing is cached. Each call reflects the filesystem at that moment.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs::{self, File};

use crate::error::{Error, Result};

/// Size and modification time of an artifact present on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl ArtifactInfo {
    fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// An artifact opened for reading.
///
/// `info` is taken from the open handle, so it describes exactly the bytes
/// `file` will yield.
#[derive(Debug)]
pub struct Artifact {
    pub file: File,
    pub info: ArtifactInfo,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `relative` against the base directory.
    ///
    /// Returns the canonical path when the target exists, the joined path
    /// otherwise, and `Error::Forbidden` when it would leave the base directory.
    pub async fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let requested = Path::new(relative);

        if relative.contains('\0') {
            return Err(Error::Forbidden(relative.to_string()));
        }
        for component in requested.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::Forbidden(relative.to_string()));
                }
            }
        }

        let joined = self.base_dir.join(requested);

        match fs::canonicalize(&joined).await {
            Ok(canonical) => {
                let base = fs::canonicalize(&self.base_dir).await?;
                if !canonical.starts_with(&base) {
                    tracing::warn!(
                        path = relative,
                        resolved = %canonical.display(),
                        "Refusing path outside the model directory"
                    );
                    return Err(Error::Forbidden(relative.to_string()));
                }
                Ok(canonical)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(joined),
            Err(e) => Err(e.into()),
        }
    }

    /// Size and mtime of the artifact, or `None` if no regular file is there.
    pub async fn stat(&self, relative: &str) -> Result<Option<ArtifactInfo>> {
        let path = self.resolve(relative).await?;

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(ArtifactInfo::from_metadata(&metadata))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Open the artifact for streaming, or `None` if no regular file is there.
    pub async fn open(&self, relative: &str) -> Result<Option<Artifact>> {
        let path = self.resolve(relative).await?;

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.to_string());

        Ok(Some(Artifact {
            file,
            info: ArtifactInfo::from_metadata(&metadata),
            file_name,
        }))
    }

    /// Read a whole file that lives under the base directory.
    ///
    /// Meant for small documents such as sidecar metadata; artifacts go
    /// through [`ArtifactStore::open`].
    pub async fn read(&self, relative: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(relative).await?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
