//! Belongs-to / has-many / has-one resolution by re-querying the related collection.

use crate::errors::DbError;
use crate::query::{Operator, Query};
use crate::record::is_falsy;
use crate::types::{ID_FIELD, Record};
use serde_json::Value;

/// Default foreign key for a type: snake_cased short name plus `_id`
/// (`BlogPost` -> `blog_post_id`). Any module path prefix is dropped.
#[must_use]
pub fn foreign_key_for(type_name: &str) -> String {
    let base = type_name.split('<').next().unwrap_or(type_name);
    let short = base.rsplit("::").next().unwrap_or(base);
    let mut out = String::with_capacity(short.len() + 4);
    for (i, ch) in short.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out.push_str("_id");
    out
}

/// Relationship source: one record plus the type and collection it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Relation<'a> {
    owner: &'a str,
    collection: &'a str,
    attributes: &'a Record,
}

impl<'a> Relation<'a> {
    /// `owner` is the record's own type name; it drives the default foreign key.
    #[must_use]
    pub fn new(owner: &'a str, collection: &'a str, attributes: &'a Record) -> Self {
        Self { owner, collection, attributes }
    }

    #[must_use]
    pub fn default_foreign_key(&self) -> String {
        foreign_key_for(self.owner)
    }

    fn key(&self, foreign_key: Option<&str>) -> String {
        foreign_key.map_or_else(|| self.default_foreign_key(), str::to_string)
    }

    /// Follow this record's foreign key to the related record.
    ///
    /// # Errors
    /// `MissingForeignKey` when the key is not among the record's attributes.
    /// A present but falsy key resolves to `Ok(None)`.
    pub fn belongs_to<T>(&self, related: Query<T>, foreign_key: Option<&str>) -> Result<Option<T>, DbError> {
        let key = self.key(foreign_key);
        let Some(value) = self.attributes.get(&key) else {
            return Err(DbError::MissingForeignKey { key, collection: self.collection.to_string() });
        };
        if is_falsy(value) {
            log::debug!("belongs_to {}.{key} is empty; no relation", self.collection);
            return Ok(None);
        }
        related.add_condition(ID_FIELD, Operator::Eq, value.clone()).first()
    }

    /// Every related record whose `foreign_key` equals this record's id.
    ///
    /// # Errors
    /// `MissingId` if this record has no id.
    pub fn has_many<T>(&self, related: Query<T>, foreign_key: Option<&str>) -> Result<Vec<T>, DbError> {
        let id = self.require_id("resolve hasMany")?;
        related.add_condition(self.key(foreign_key), Operator::Eq, id.clone()).get()
    }

    /// First related record whose `foreign_key` equals this record's id.
    ///
    /// # Errors
    /// `MissingId` if this record has no id.
    pub fn has_one<T>(&self, related: Query<T>, foreign_key: Option<&str>) -> Result<Option<T>, DbError> {
        let id = self.require_id("resolve hasOne")?;
        related.add_condition(self.key(foreign_key), Operator::Eq, id.clone()).first()
    }

    fn require_id(&self, operation: &str) -> Result<&'a Value, DbError> {
        match self.attributes.get(ID_FIELD) {
            Some(v) if !v.is_null() => Ok(v),
            _ => Err(DbError::MissingId { collection: self.collection.to_string(), operation: operation.into() }),
        }
    }
}
