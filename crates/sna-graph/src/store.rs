use crate::snapshot::GraphSnapshot;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Store task failed: {0}")]
    Task(String),
}

/// Durable home for graph snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Overwrites the stored snapshot.
    fn save(&self, snapshot: &GraphSnapshot) -> Result<(), StoreError>;

    /// Reads the stored snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<GraphSnapshot>, StoreError>;

    /// Forgets the stored snapshot.
    fn clear(&self) -> Result<(), StoreError>;

    /// Where the data lives, for log and status output.
    fn location(&self) -> &Path;
}

/// Which `SnapshotStore` implementation to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// A single pretty-printed JSON file.
    #[default]
    Json,
    /// An embedded sled database.
    Sled,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Json => write!(f, "json"),
            StoreBackend::Sled => write!(f, "sled"),
        }
    }
}

/// Opens the store for `backend` at `path`.
pub fn open_store(
    backend: StoreBackend,
    path: impl AsRef<Path>,
) -> Result<Box<dyn SnapshotStore>, StoreError> {
    match backend {
        StoreBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StoreBackend::Sled => Ok(Box::new(SledStore::open(path)?)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps the snapshot in a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &GraphSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        info!("Graph saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<GraphSnapshot>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No graph file at {}, starting empty", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: GraphSnapshot = serde_json::from_str(&content)?;
        info!("Graph loaded from {}", self.path.display());
        Ok(Some(snapshot))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// sled
// ─────────────────────────────────────────────────────────────────────────────

const SNAPSHOT_KEY: &str = "main_graph";

/// Keeps the snapshot bincode-encoded in a sled database.
pub struct SledStore {
    db: Db,
    path: PathBuf,
}

impl SledStore {
    /// Opens or creates a store at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl SnapshotStore for SledStore {
    /// The snapshot is stored under a fixed key "main_graph".
    fn save(&self, snapshot: &GraphSnapshot) -> Result<(), StoreError> {
        let bytes = bincode::serialize(snapshot)?;
        self.db.insert(SNAPSHOT_KEY, bytes)?;
        self.db.flush()?;
        info!("Graph saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<GraphSnapshot>, StoreError> {
        if let Some(bytes) = self.db.get(SNAPSHOT_KEY)? {
            let snapshot: GraphSnapshot = bincode::deserialize(&bytes)?;
            info!("Graph loaded from {}", self.path.display());
            Ok(Some(snapshot))
        } else {
            Ok(None)
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.db.remove(SNAPSHOT_KEY)?;
        self.db.flush()?;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SocialGraph;
    use sna_core::Vertex;
    use tempfile::tempdir;

    fn sample_snapshot() -> GraphSnapshot {
        let mut graph = SocialGraph::new();
        graph.add_vertex(Vertex::new("1", "Ada")).unwrap();
        graph.add_vertex(Vertex::new("2", "Bob")).unwrap();
        graph.add_relationship("1", "2").unwrap();
        graph.export_snapshot()
    }

    #[test]
    fn test_json_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("graph.json"));
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_json_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("graph.json");
        let store = JsonFileStore::new(&path);

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();
        assert!(path.exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_sled_save_load() {
        let dir = tempdir().unwrap();
        let store = SledStore::open(dir.path()).unwrap();
        assert!(store.load().unwrap().is_none());

        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_open_store_by_backend() {
        let dir = tempdir().unwrap();
        let store = open_store(StoreBackend::Json, dir.path().join("g.json")).unwrap();
        store.save(&sample_snapshot()).unwrap();
        assert_eq!(store.location(), dir.path().join("g.json"));

        let store = open_store(StoreBackend::Sled, dir.path().join("db")).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
