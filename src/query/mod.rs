//! Predicate chains evaluated by linear scan over a collection.
mod builder;
mod eval;
mod types;

pub use builder::Query;
pub use eval::{compare_loose, eval_condition, like_matches, loose_eq};
pub use types::{Condition, Operator};
