//! Whole-file JSON persistence of one named collection.
mod core;
mod lock;
mod ops;

pub use self::core::CollectionStore;
