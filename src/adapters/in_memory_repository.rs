//! In-memory Q-table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of QTableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// Stores encoded tables in a shared HashMap keyed by path. Clones share the
/// same storage.
///
/// # Examples
///
/// ```
/// use flapq::adapters::InMemoryRepository;
/// use flapq::q_learning::{QLearningAgent, QLearningParams};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(QLearningParams::default())?;
///
/// agent.save_q_table(&repo, Path::new("q_table"))?;
/// assert!(repo.contains(Path::new("q_table")));
/// # Ok::<(), flapq::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still structurally valid.
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }

    /// Store raw bytes under `path`, e.g. to simulate a damaged file.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(key(path), bytes);
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let storage = self.storage();

        let bytes = storage
            .get(&key(path))
            .ok_or_else(|| Error::StorageNotFound {
                path: path.to_path_buf(),
            })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::StorageCorrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
