use thiserror::Error;

/// Broad failure category, so callers can branch without listing every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    MalformedState,
    Precondition,
    Serialization,
    Config,
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed collection file {path}: {reason}")]
    MalformedCollection { path: String, reason: String },

    #[error("Cannot {operation}: missing 'id' in record of collection [{collection}]")]
    MissingId { collection: String, operation: String },

    #[error("Foreign key '{key}' not found in record of collection [{collection}]")]
    MissingForeignKey { key: String, collection: String },

    #[error("Collection name must be defined: {0}")]
    UndefinedCollection(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DbError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::MalformedCollection { .. } => ErrorKind::MalformedState,
            Self::MissingId { .. } | Self::MissingForeignKey { .. } | Self::UndefinedCollection(_) => {
                ErrorKind::Precondition
            }
            Self::Json(_) => ErrorKind::Serialization,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<tempfile::PersistError> for DbError {
    fn from(e: tempfile::PersistError) -> Self {
        Self::Io(format!("failed to persist collection file: {}", e.error))
    }
}
