//! MessagePack implementation of the Q-table repository.
//!
//! This adapter implements the QTableRepository port using rmp_serde for
//! compact binary serialization. Writes go to a temporary file next to the
//! destination which is then renamed over it.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// MessagePack-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use flapq::adapters::MsgPackRepository;
/// use flapq::q_learning::{QLearningAgent, QLearningParams};
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let agent = QLearningAgent::new(QLearningParams::default())?;
///
/// agent.save_q_table(&repo, Path::new("q_table.msgpack"))?;
///
/// let restored = QLearningAgent::open(
///     QLearningParams::default(),
///     &repo,
///     Path::new("q_table.msgpack"),
/// )?;
/// # Ok::<(), flapq::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        write_atomic(table, path)?;
        debug!(path = %path.display(), states = table.entries.len(), "Q-table written");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        read_msgpack(path)
    }
}

/// Encode `value` as MessagePack into a temporary file beside `path`, then
/// rename it over `path`.
pub(crate) fn write_atomic<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
        operation: format!("create temporary file in {dir:?}"),
        source,
    })?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        rmp_serde::encode::write(&mut writer, value).map_err(|e| Error::SerializationContext {
            operation: format!("serialize {path:?} to MessagePack"),
            message: e.to_string(),
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush temporary file for {path:?}"),
            source,
        })?;
    }
    temp.as_file().sync_all().map_err(|source| Error::Io {
        operation: format!("sync temporary file for {path:?}"),
        source,
    })?;

    temp.persist(path).map_err(|e| Error::Io {
        operation: format!("replace {path:?}"),
        source: e.error,
    })?;
    Ok(())
}

/// Decode a MessagePack file, separating "absent" from "unreadable".
pub(crate) fn read_msgpack<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::StorageNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(Error::StorageCorrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::StorageCorrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
