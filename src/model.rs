//! Typed wrappers over records.
//!
//! A model names its collection and knows how to build itself from a single
//! record. [`crate::Database`] forwards model calls into the query and storage core.

use crate::record::id_of;
use crate::types::{Record, RecordId};
use serde_json::Value;

pub trait Model: Sized + 'static {
    /// Collection (file stem) holding this model's records.
    const COLLECTION: &'static str;

    fn from_record(record: Record) -> Self;

    fn attributes(&self) -> &Record;

    fn attributes_mut(&mut self) -> &mut Record;

    /// Short type name used to derive default foreign keys.
    fn type_name() -> &'static str {
        short_type_name::<Self>()
    }

    fn get_attribute(&self, key: &str) -> Option<&Value> {
        self.attributes().get(key)
    }

    fn id(&self) -> Option<RecordId> {
        id_of(self.attributes())
    }

    fn to_json(&self) -> Value {
        Value::Object(self.attributes().clone())
    }
}

/// `std::any::type_name` without module path or generic arguments.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
