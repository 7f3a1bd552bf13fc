use serde_json::{Map, Value};

pub type CollectionName = String;
pub type RecordId = i64;

/// A record is a JSON object. Field order is preserved across round-trips.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";
