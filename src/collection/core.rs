use super::lock::lock_for;
use crate::config::StoreConfig;
use crate::errors::DbError;
use crate::fsutil;
use crate::types::Record;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle on the JSON file backing one collection.
///
/// Holds no record data: every read goes back to disk.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    name: String,
    path: PathBuf,
    file_mode: u32,
    indent: usize,
    pub(super) write_lock: Arc<Mutex<()>>,
}

impl CollectionStore {
    /// Resolve `{base_path}/{name}.json`, creating the directory and an empty
    /// collection file when they are absent.
    ///
    /// # Errors
    /// `UndefinedCollection` for a blank name; `Io` if the directory or file cannot be created.
    pub fn open(name: &str, config: &StoreConfig) -> Result<Self, DbError> {
        if name.trim().is_empty() {
            return Err(DbError::UndefinedCollection("empty collection name".into()));
        }
        fsutil::ensure_dir(&config.base_path, config.dir_mode).map_err(|e| {
            DbError::Io(format!("failed to create data directory {}: {e}", config.base_path.display()))
        })?;
        let path = config.collection_path(name);
        if fsutil::create_if_missing(&path, b"[]")? {
            log::info!("created collection file {}", path.display());
        }
        let key = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        Ok(Self {
            name: name.to_string(),
            path,
            file_mode: config.file_mode,
            indent: config.indent,
            write_lock: lock_for(&key),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record in file order. Absent or blank files read as empty.
    ///
    /// # Errors
    /// `Io` when the file exists but cannot be read; `MalformedCollection` when the
    /// content is not a JSON array of objects.
    pub fn read_all(&self) -> Result<Vec<Record>, DbError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed: Value = serde_json::from_str(&text).map_err(|e| self.malformed(e.to_string()))?;
        let records = match parsed {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(obj) => Ok(obj),
                    other => Err(self.malformed(format!("element {i} is not an object: {other}"))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(self.malformed("top-level value is not an array".into())),
        };
        log::debug!("read {} records from {}", records.len(), self.name);
        Ok(records)
    }

    /// Overwrite the collection with `records`.
    ///
    /// # Errors
    /// `Json` if encoding fails; `Io` if the replacement cannot be written.
    pub fn write_all(&self, records: &[Record]) -> Result<(), DbError> {
        let _guard = self.write_lock.lock();
        self.write_unlocked(records)
    }

    pub(super) fn write_unlocked(&self, records: &[Record]) -> Result<(), DbError> {
        let indent = vec![b' '; self.indent];
        let mut buf = Vec::with_capacity(64 * records.len() + 2);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;
        fsutil::write_atomic(&self.path, &buf, self.file_mode)?;
        log::debug!("wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn malformed(&self, reason: String) -> DbError {
        DbError::MalformedCollection { path: self.path.display().to_string(), reason }
    }
}
