use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Comparison operator of a single predicate.
///
/// Parsing never fails: anything outside the supported set becomes
/// `Unsupported`, which matches no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Like,
    Unsupported(String),
}

impl Operator {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "=" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            "LIKE" => Self::Like,
            other => Self::Unsupported(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Like => "LIKE",
            Self::Unsupported(s) => s,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `field op value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: impl Into<Operator>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), op: op.into(), value: value.into() }
    }
}
