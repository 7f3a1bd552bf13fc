use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Weak};

// One mutex per backing file, shared by every live store instance of this process.
// Entries are weak; dead ones are pruned on the next lookup.
static COLLECTION_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Lock handle for the collection file at `path`. Callers must pass a canonical path.
pub(super) fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = COLLECTION_LOCKS.lock();
    locks.retain(|_, w| w.strong_count() > 0);
    if let Some(lock) = locks.get(path).and_then(Weak::upgrade) {
        return lock;
    }
    let lock = Arc::new(Mutex::new(()));
    locks.insert(path.to_path_buf(), Arc::downgrade(&lock));
    lock
}

#[cfg(test)]
fn is_registered(path: &Path) -> bool {
    COLLECTION_LOCKS.lock().get(path).is_some_and(|w| w.strong_count() > 0)
}
