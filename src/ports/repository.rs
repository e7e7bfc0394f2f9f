//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading Q-tables.
///
/// # Contract
///
/// - `load` of a path that holds nothing returns [`crate::Error::StorageNotFound`].
/// - `load` of existing but undecodable data returns [`crate::Error::StorageCorrupt`].
/// - `save` never leaves partially written data visible under `path`.
///
/// # Examples
///
/// ```no_run
/// use flapq::ports::QTableRepository;
/// use flapq::q_learning::SavedQTable;
/// use std::path::Path;
///
/// fn checkpoint<R: QTableRepository>(
///     repo: &R,
///     table: &SavedQTable,
///     path: &Path,
/// ) -> flapq::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait QTableRepository {
    /// Save a Q-table to persistent storage.
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()>;

    /// Load a Q-table from persistent storage.
    fn load(&self, path: &Path) -> Result<SavedQTable>;
}
