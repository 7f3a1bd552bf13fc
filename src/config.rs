use crate::errors::DbError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";

/// Storage configuration handed to every collection store and query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one `{collection}.json` file per collection.
    pub base_path: PathBuf,
    /// Unix permission bits for a newly created base directory.
    pub dir_mode: u32,
    /// Unix permission bits applied to rewritten collection files.
    pub file_mode: u32,
    /// Spaces per indentation level in the pretty-printed file.
    pub indent: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { base_path: PathBuf::from(DEFAULT_DATA_DIR), dir_mode: 0o755, file_mode: 0o644, indent: 4 }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into(), ..Self::default() }
    }

    /// Backing file for `collection`.
    #[must_use]
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_path.join(format!("{collection}.json"))
    }

    /// Parse a TOML document; missing keys fall back to defaults.
    ///
    /// # Errors
    /// Returns `DbError::Config` when the text is not valid TOML for this struct.
    pub fn from_toml_str(s: &str) -> Result<Self, DbError> {
        toml::from_str(s).map_err(|e| DbError::Config(e.to_string()))
    }

    /// # Errors
    /// Returns `DbError::Config` if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, DbError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("{}: {e}", path.display())))?;
        let cfg = Self::from_toml_str(&s)?;
        log::debug!("loaded store config from {}: base_path={}", path.display(), cfg.base_path.display());
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StoreConfig::default();
        assert_eq!(c.base_path, PathBuf::from("data"));
        assert_eq!(c.dir_mode, 0o755);
        assert_eq!(c.indent, 4);
        assert_eq!(c.collection_path("users"), PathBuf::from("data").join("users.json"));
    }

    #[test]
    fn toml_partial_override() {
        let c = StoreConfig::from_toml_str("base_path = \"/tmp/store\"\nindent = 2\n").unwrap();
        assert_eq!(c.base_path, PathBuf::from("/tmp/store"));
        assert_eq!(c.indent, 2);
        assert_eq!(c.file_mode, 0o644);
    }

    #[test]
    fn toml_rejects_bad_types() {
        let e = StoreConfig::from_toml_str("indent = \"wide\"").unwrap_err();
        assert!(matches!(e, DbError::Config(_)));
    }

    #[test]
    fn toml_file_missing_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let e = StoreConfig::from_toml_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(e, DbError::Config(_)));
    }
}
