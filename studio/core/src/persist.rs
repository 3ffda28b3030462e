//! Snapshot Persistence
//!
//! Best-effort, single-key storage of the project snapshot. The store
//! writes through after every mutation; a failed write is logged and
//! swallowed so editing never stalls on disk trouble.
//!
//! # XDG Base Directory Compliance
//!
//! The default file location follows the XDG Base Directory
//! specification: `$XDG_DATA_HOME/chatbubbles/project.json`
//! (typically `~/.local/share/chatbubbles/project.json`).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::snapshot::ProjectSnapshot;

/// Errors that can occur while loading or saving a snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read or write the snapshot file
    #[error("failed to access snapshot at {path}: {source}")]
    Io {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The snapshot file exists but does not parse
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where project snapshots live
///
/// The seam between the store and whatever holds the last-saved
/// snapshot - a file in production, memory in tests and headless runs.
pub trait ProjectStorage: Send {
    /// Load the persisted snapshot, `None` if nothing was ever saved
    fn load(&self) -> Result<Option<ProjectSnapshot>, StorageError>;

    /// Replace the persisted snapshot
    fn save(&mut self, snapshot: &ProjectSnapshot) -> Result<(), StorageError>;
}

/// File-backed storage, one JSON document at a fixed path
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the XDG default location
    pub fn at_default() -> Self {
        Self::new(default_snapshot_path())
    }

    /// The path this storage reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStorage for FileStorage {
    fn load(&self) -> Result<Option<ProjectSnapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = ProjectSnapshot::from_json(&raw)?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &ProjectSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = snapshot.to_json()?;
        std::fs::write(&self.path, json).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Persisted project snapshot");
        Ok(())
    }
}

/// In-memory storage for tests and headless runs
#[derive(Default)]
pub struct MemoryStorage {
    slot: Option<String>,
}

impl MemoryStorage {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been saved
    pub fn is_saved(&self) -> bool {
        self.slot.is_some()
    }
}

impl ProjectStorage for MemoryStorage {
    fn load(&self) -> Result<Option<ProjectSnapshot>, StorageError> {
        match &self.slot {
            Some(raw) => Ok(Some(ProjectSnapshot::from_json(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, snapshot: &ProjectSnapshot) -> Result<(), StorageError> {
        self.slot = Some(snapshot.to_json()?);
        Ok(())
    }
}

/// Default snapshot path under the platform data directory
pub fn default_snapshot_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chatbubbles")
        .join("project.json")
}
