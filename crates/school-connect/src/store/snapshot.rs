use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::SchoolStore;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("snapshot {path} is not valid: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SchoolStore {
    /// Load a snapshot; unique constraints are re-checked while reading.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = fs::read(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let store: SchoolStore =
            serde_json::from_slice(&raw).map_err(|source| SnapshotError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "store snapshot loaded");
        Ok(store)
    }

    /// Load `path` when it exists, otherwise start empty.
    pub fn load_or_default(path: &Path) -> Result<Self, SnapshotError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no snapshot yet, starting with an empty store");
            Ok(Self::default())
        }
    }

    /// Write the snapshot next to `path` and rename it into place.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec_pretty(self)?;
        let staging = path.with_extension("tmp");
        let write_err = |source| SnapshotError::Write {
            path: path.to_path_buf(),
            source,
        };
        fs::write(&staging, encoded).map_err(write_err)?;
        fs::rename(&staging, path).map_err(write_err)?;
        info!(path = %path.display(), "store snapshot written");
        Ok(())
    }
}
