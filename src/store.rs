//! Record persistence behind an explicitly passed store handle.
//!
//! A store holds exactly one collection of records, written and read
//! wholesale. There are no partial updates and the last write wins.

use std::fs::{self, File, create_dir_all};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use thiserror::Error;

use crate::record::{RecordError, UserRecord, validate_records};
use crate::saving::SnapshotStore;

/// Key the records are stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "users";

/// Directory holding file-backed stores by default
pub const DATABASE_DIR: &str = "database";

/// Errors raised by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("stored records are invalid: {0}")]
    Invalid(#[from] RecordError),

    #[error("unsupported store path {0}")]
    UnsupportedPath(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value style storage for one record collection.
pub trait RecordStore: Send + Sync {
    /// Read the stored collection, or `None` if nothing was stored yet.
    fn load(&self) -> StoreResult<Option<Vec<UserRecord>>>;

    /// Replace the stored collection.
    fn save(&self, records: &[UserRecord]) -> StoreResult<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Check a freshly loaded collection before handing it out.
pub(crate) fn checked(records: Vec<UserRecord>) -> StoreResult<Option<Vec<UserRecord>>> {
    validate_records(&records)?;
    Ok(Some(records))
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Option<Vec<UserRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<UserRecord>) -> Self {
        MemoryStore {
            records: Mutex::new(Some(records)),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Vec<UserRecord>>> {
        let stored = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match stored {
            Some(records) => checked(records),
            None => Ok(None),
        }
    }

    fn save(&self, records: &[UserRecord]) -> StoreResult<()> {
        let mut stored = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stored = Some(records.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Records as one pretty-printed JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Store for `key` inside `dir`, i.e. `<dir>/<key>.json`.
    pub fn for_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", key)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::for_key(DATABASE_DIR, DEFAULT_KEY)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Vec<UserRecord>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<UserRecord> = serde_json::from_reader(BufReader::new(file))?;
        debug!("read {} records from {}", records.len(), self.path.display());
        checked(records)
    }

    fn save(&self, records: &[UserRecord]) -> StoreResult<()> {
        ensure_parent(&self.path)?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && fs::metadata(dir).is_err() => {
            create_dir_all(dir)
        }
        _ => Ok(()),
    }
}

/// Open a file-backed store, choosing the format by extension
///
/// * `.json` - [`JsonFileStore`]
/// * `.gz` (e.g. `users.bin.gz`) - [`SnapshotStore`]
///
/// # Errors
/// * `StoreError::UnsupportedPath` for any other extension
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<Box<dyn RecordStore>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonFileStore::new(path))),
        Some("gz") => Ok(Box::new(SnapshotStore::new(path))),
        _ => Err(StoreError::UnsupportedPath(path.to_path_buf())),
    }
}
