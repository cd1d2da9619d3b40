//! Project configuration in `.sna/config.json`.

use serde::{Deserialize, Serialize};
use sna_graph::StoreBackend;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = ".sna";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub storage: StorageConfig,
    pub server: ServerSection,
    /// Save the graph when `serve` shuts down.
    pub autosave: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    /// Relative paths resolve against the project root. Unset means the
    /// platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            storage: StorageConfig::default(),
            server: ServerSection::default(),
            autosave: true,
        }
    }
}

impl Config {
    /// The config `sna init` writes: data kept next to the config file.
    pub fn project() -> Self {
        Self {
            storage: StorageConfig {
                backend: StoreBackend::Json,
                path: Some(Path::new(CONFIG_DIR).join("graph.json")),
            },
            ..Self::default()
        }
    }

    pub fn file_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Reads `<root>/.sna/config.json`, or `None` if it doesn't exist.
    pub fn load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = Self::file_path(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// The config file under `root` if present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load(root)?.unwrap_or_default())
    }

    /// Where the snapshot lives for a project rooted at `root`.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        match &self.storage.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => default_data_path(),
        }
    }
}

/// `<platform data dir>/sna/graph.json`, or `./sna/graph.json` when the
/// platform has no data directory.
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sna")
        .join("graph.json")
}
