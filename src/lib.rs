pub mod collection;
pub mod config;
pub mod errors;
pub mod fsutil;
pub mod logger;
pub mod model;
pub mod query;
pub mod record;
pub mod relation;
pub mod types;

use crate::collection::CollectionStore;
use crate::config::StoreConfig;
use crate::errors::DbError;
use crate::model::Model;
use crate::query::{Operator, Query};
use crate::relation::Relation;
use crate::types::{ID_FIELD, Record, RecordId};
use serde_json::Value;
use std::path::Path;

/// Entry point over a data directory.
///
/// Holds only configuration; every call opens the collection file it needs.
#[derive(Debug, Clone, Default)]
pub struct Database {
    config: StoreConfig,
}

impl Database {
    /// Uses the default `data` directory under the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn open<P: AsRef<Path>>(base_path: P) -> Self {
        Self::with_config(StoreConfig::with_base_path(base_path.as_ref()))
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// # Errors
    /// Fails like [`CollectionStore::open`].
    pub fn collection(&self, name: &str) -> Result<CollectionStore, DbError> {
        CollectionStore::open(name, &self.config)
    }

    /// Unfiltered query over raw records of `name`.
    ///
    /// # Errors
    /// Fails like [`CollectionStore::open`].
    pub fn query(&self, name: &str) -> Result<Query, DbError> {
        Query::open(name, &self.config)
    }

    // --- Model API (forwards into the core) ---

    /// Query over `M`'s collection whose results are built with `M::from_record`.
    ///
    /// # Errors
    /// `UndefinedCollection` when `M::COLLECTION` is blank.
    pub fn model_query<M: Model>(&self) -> Result<Query<M>, DbError> {
        Ok(Query::open(collection_of::<M>()?, &self.config)?.bind(M::from_record))
    }

    /// # Errors
    /// `UndefinedCollection` or a read failure.
    pub fn all<M: Model>(&self) -> Result<Vec<M>, DbError> {
        self.model_query::<M>()?.get()
    }

    /// Start a model query with one predicate.
    ///
    /// # Errors
    /// `UndefinedCollection` when `M::COLLECTION` is blank.
    pub fn filter<M: Model>(
        &self,
        field: &str,
        op: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Result<Query<M>, DbError> {
        Ok(self.model_query::<M>()?.add_condition(field, op, value))
    }

    /// # Errors
    /// `UndefinedCollection` or a storage failure.
    pub fn create<M: Model>(&self, data: Record) -> Result<M, DbError> {
        let record = CollectionStore::open(collection_of::<M>()?, &self.config)?.insert(data)?;
        Ok(M::from_record(record))
    }

    /// # Errors
    /// `UndefinedCollection` or a read failure.
    pub fn find<M: Model>(&self, id: RecordId) -> Result<Option<M>, DbError> {
        self.model_query::<M>()?.add_condition(ID_FIELD, Operator::Eq, id).first()
    }

    /// Merge `data` into the stored record and refresh `model` from it.
    /// Returns false when the record no longer exists.
    ///
    /// # Errors
    /// `MissingId` when `model` has no integer id; otherwise storage failures.
    pub fn update<M: Model>(&self, model: &mut M, data: Record) -> Result<bool, DbError> {
        let collection = collection_of::<M>()?;
        let id = model.id().ok_or_else(|| DbError::MissingId {
            collection: collection.to_string(),
            operation: "update".into(),
        })?;
        match CollectionStore::open(collection, &self.config)?.update(id, data)? {
            Some(record) => {
                *model.attributes_mut() = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// # Errors
    /// `MissingId` when `model` has no integer id; otherwise storage failures.
    pub fn delete<M: Model>(&self, model: &M) -> Result<bool, DbError> {
        let collection = collection_of::<M>()?;
        let id = model.id().ok_or_else(|| DbError::MissingId {
            collection: collection.to_string(),
            operation: "delete".into(),
        })?;
        CollectionStore::open(collection, &self.config)?.delete(id)
    }

    /// `R` that `model` points at. The default key is derived from `M`'s own type name.
    ///
    /// # Errors
    /// See [`Relation::belongs_to`].
    pub fn belongs_to<M: Model, R: Model>(&self, model: &M, foreign_key: Option<&str>) -> Result<Option<R>, DbError> {
        relation_of(model)?.belongs_to(self.model_query::<R>()?, foreign_key)
    }

    /// # Errors
    /// See [`Relation::has_many`].
    pub fn has_many<M: Model, R: Model>(&self, model: &M, foreign_key: Option<&str>) -> Result<Vec<R>, DbError> {
        relation_of(model)?.has_many(self.model_query::<R>()?, foreign_key)
    }

    /// # Errors
    /// See [`Relation::has_one`].
    pub fn has_one<M: Model, R: Model>(&self, model: &M, foreign_key: Option<&str>) -> Result<Option<R>, DbError> {
        relation_of(model)?.has_one(self.model_query::<R>()?, foreign_key)
    }
}

fn collection_of<M: Model>() -> Result<&'static str, DbError> {
    if M::COLLECTION.trim().is_empty() {
        return Err(DbError::UndefinedCollection(M::type_name().to_string()));
    }
    Ok(M::COLLECTION)
}

fn relation_of<M: Model>(model: &M) -> Result<Relation<'_>, DbError> {
    Ok(Relation::new(M::type_name(), collection_of::<M>()?, model.attributes()))
}

/// Initializes logging from `log4rs.yaml` in the working directory.
///
/// # Errors
/// Returns an error if the logger cannot be configured.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
