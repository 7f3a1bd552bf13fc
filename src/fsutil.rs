use std::fs::{DirBuilder, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Create `dir` and any missing parents. `mode` applies to created directories on Unix.
///
/// # Errors
/// Returns an error if a component cannot be created.
pub fn ensure_dir(dir: &Path, mode: u32) -> io::Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(dir)
}

/// Replace `path` with `bytes` via a temp file in the same directory and a rename,
/// so readers never observe a half-written file.
///
/// # Errors
/// Returns an error if the temp file cannot be written or persisted.
pub fn write_atomic(path: &Path, bytes: &[u8], mode: u32) -> Result<(), crate::errors::DbError> {
    let parent = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    apply_mode(tmp.as_file(), mode)?;
    tmp.persist(path)?;
    Ok(())
}

/// Create an empty file holding `contents` only when nothing exists at `path`.
///
/// # Errors
/// Returns an error if the file cannot be created.
pub fn create_if_missing(path: &Path, contents: &[u8]) -> io::Result<bool> {
    use std::fs::OpenOptions;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut f) => {
            f.write_all(contents)?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn apply_mode(file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}
