use metrics_exporter_prometheus::PrometheusHandle;
use school_connect::store::{SchoolStore, SnapshotError};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

/// Operational state behind the health, readiness and metrics routes.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The store together with the snapshot file it round-trips through.
pub(crate) struct PersistedStore {
    pub(crate) store: Arc<SchoolStore>,
    path: Option<PathBuf>,
}

impl PersistedStore {
    pub(crate) fn open(path: Option<PathBuf>) -> Result<Self, SnapshotError> {
        let store = match path.as_deref() {
            Some(path) => SchoolStore::load_or_default(path)?,
            None => {
                warn!("APP_DATA_FILE is unset; data lives in memory only");
                SchoolStore::default()
            }
        };
        Ok(Self {
            store: Arc::new(store),
            path,
        })
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the snapshot, when a file is configured.
    pub(crate) fn persist(&self) -> Result<(), SnapshotError> {
        match self.path.as_deref() {
            Some(path) => self.store.save(path),
            None => {
                info!("no snapshot file configured, skipping persistence");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_starts_empty_and_persists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.json");

        let persisted = PersistedStore::open(Some(path.clone())).expect("store opens");
        assert_eq!(persisted.path(), Some(path.as_path()));
        persisted.persist().expect("snapshot written");
        assert!(path.exists());

        let reopened = PersistedStore::open(Some(path)).expect("store reopens");
        let counts = reopened.store.row_counts().expect("counts");
        assert!(counts.values().all(|rows| *rows == 0));
    }

    #[test]
    fn memory_only_store_skips_persistence() {
        let persisted = PersistedStore::open(None).expect("store opens");
        assert!(persisted.path().is_none());
        persisted.persist().expect("nothing to write");
    }
}
