use super::core::CollectionStore;
use crate::errors::DbError;
use crate::record::{id_of, max_id, merge_patch, stamp_new};
use crate::types::{Record, RecordId};

fn audit(op: &str, collection: &str, id: RecordId) {
    log::info!(target: "filelite::audit", "op={op} collection={collection} id={id}");
}

impl CollectionStore {
    /// Assign the next id, stamp timestamps, append and persist.
    ///
    /// The id is `max(existing) + 1`, so ids freed by deletes are never handed out
    /// again while a higher id survives.
    ///
    /// # Errors
    /// `MalformedCollection` when the largest stored id is already `i64::MAX`;
    /// otherwise propagates read and write failures.
    pub fn insert(&self, data: Record) -> Result<Record, DbError> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_all()?;
        let id = match max_id(&records) {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| DbError::MalformedCollection {
                path: self.path().display().to_string(),
                reason: format!("id space exhausted (max id {max})"),
            })?,
        };
        let record = stamp_new(id, data);
        records.push(record.clone());
        self.write_unlocked(&records)?;
        audit("insert", self.name(), id);
        Ok(record)
    }

    /// Merge `patch` into the record with `id`. Returns `None` without touching the
    /// file when no record matches.
    ///
    /// # Errors
    /// Propagates read and write failures.
    pub fn update(&self, id: RecordId, patch: Record) -> Result<Option<Record>, DbError> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_all()?;
        let Some(record) = records.iter_mut().find(|r| id_of(r) == Some(id)) else {
            log::debug!("update: no record {id} in {}", self.name());
            return Ok(None);
        };
        merge_patch(record, patch);
        let updated = record.clone();
        self.write_unlocked(&records)?;
        audit("update", self.name(), id);
        Ok(Some(updated))
    }

    /// Remove the record with `id`. Returns whether anything was removed; the file is
    /// only rewritten when it was.
    ///
    /// # Errors
    /// Propagates read and write failures.
    pub fn delete(&self, id: RecordId) -> Result<bool, DbError> {
        let _guard = self.write_lock.lock();
        let mut records = self.read_all()?;
        let before = records.len();
        records.retain(|r| id_of(r) != Some(id));
        if records.len() == before {
            return Ok(false);
        }
        self.write_unlocked(&records)?;
        audit("delete", self.name(), id);
        Ok(true)
    }

    /// Primary-key lookup.
    ///
    /// # Errors
    /// Propagates read failures.
    pub fn find(&self, id: RecordId) -> Result<Option<Record>, DbError> {
        Ok(self.read_all()?.into_iter().find(|r| id_of(r) == Some(id)))
    }
}
