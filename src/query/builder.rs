use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::eval::Compiled;
use super::types::{Condition, Operator};
use crate::collection::CollectionStore;
use crate::config::StoreConfig;
use crate::errors::DbError;
use crate::types::Record;

type Adapter<T> = Arc<dyn Fn(Record) -> T + Send + Sync>;

/// Conjunctive predicate chain over one collection.
///
/// Results come back as raw [`Record`]s unless an adapter was bound with
/// [`Query::bind`], in which case each match is passed through it.
pub struct Query<T = Record> {
    store: CollectionStore,
    conditions: Vec<Condition>,
    adapt: Adapter<T>,
}

impl Query<Record> {
    #[must_use]
    pub fn new(store: CollectionStore) -> Self {
        Self { store, conditions: Vec::new(), adapt: Arc::new(|r: Record| r) }
    }

    /// # Errors
    /// Fails like [`CollectionStore::open`].
    pub fn open(collection: &str, config: &StoreConfig) -> Result<Self, DbError> {
        Ok(Self::new(CollectionStore::open(collection, config)?))
    }
}

impl<T> Query<T> {
    /// Append a predicate. Unsupported operators are accepted and match nothing.
    #[must_use]
    pub fn add_condition(
        mut self,
        field: impl Into<String>,
        op: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition::new(field, op, value));
        self
    }

    /// Replace the result adapter. Filtering is unaffected.
    #[must_use]
    pub fn bind<U, F>(self, adapt: F) -> Query<U>
    where
        F: Fn(Record) -> U + Send + Sync + 'static,
    {
        Query { store: self.store, conditions: self.conditions, adapt: Arc::new(adapt) }
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[must_use]
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// All matching records, adapted, in insertion order.
    ///
    /// # Errors
    /// Propagates collection read failures.
    pub fn get(&self) -> Result<Vec<T>, DbError> {
        Ok(self.matching()?.into_iter().map(|r| (self.adapt)(r)).collect())
    }

    /// # Errors
    /// Propagates collection read failures.
    pub fn first(&self) -> Result<Option<T>, DbError> {
        Ok(self.matching()?.into_iter().next().map(|r| (self.adapt)(r)))
    }

    /// # Errors
    /// Propagates collection read failures.
    pub fn count(&self) -> Result<usize, DbError> {
        Ok(self.matching()?.len())
    }

    // Each condition filters the survivors of the previous one.
    fn matching(&self) -> Result<Vec<Record>, DbError> {
        let mut items = self.store.read_all()?;
        for cond in &self.conditions {
            if !cond.op.is_supported() {
                log::warn!(
                    "unsupported operator {:?} on {}.{}; predicate matches nothing",
                    cond.op.as_str(),
                    self.store.name(),
                    cond.field
                );
            }
            let compiled = Compiled::new(cond);
            items.retain(|r| compiled.matches(r));
        }
        log::debug!(
            "query {}: {} conditions, {} matches",
            self.store.name(),
            self.conditions.len(),
            items.len()
        );
        Ok(items)
    }
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), conditions: self.conditions.clone(), adapt: Arc::clone(&self.adapt) }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("collection", &self.store.name())
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}
