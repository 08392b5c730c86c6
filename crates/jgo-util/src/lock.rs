//! Advisory cross-process file locking.
//!
//! One exclusive writer per environment fingerprint or per-repository cache
//! file; readers wait (spec §5 shared resources, §4.6 concurrency). Backed
//! by `fs2`'s advisory OS file locks, plus an in-process per-path `Mutex` so
//! two threads in the same process don't race to open/lock the same path.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use fs2::FileExt;

use crate::errors::JgoError;

/// A held exclusive lock on a path. Unlocked automatically on drop.
pub struct FileLock {
    file: File,
    path: PathBuf,
    _guard: MutexGuard<'static, ()>,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`, creating the file (and its
    /// parent directory) if needed. Blocks until the lock is available.
    pub fn acquire_exclusive(path: &Path) -> Result<Self, JgoError> {
        let mutex = process_lock_for_path(path);
        let guard = mutex.lock().unwrap_or_else(|poisoned| {
            tracing::error!(path = %path.display(), "lock mutex poisoned, recovering");
            poisoned.into_inner()
        });

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;
        file.lock_exclusive()?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            _guard: guard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn process_lock_for_path(path: &Path) -> &'static Mutex<()> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, &'static Mutex<()>>>> = OnceLock::new();
    let registry = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));

    let mut registry = registry.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(existing) = registry.get(path) {
        return existing;
    }
    let leaked: &'static Mutex<()> = Box::leak(Box::new(Mutex::new(())));
    registry.insert(path.to_path_buf(), leaked);
    leaked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_release_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("env.lock");
        {
            let lock = FileLock::acquire_exclusive(&lock_path).unwrap();
            assert_eq!(lock.path(), lock_path);
        }
        // Should be re-acquirable immediately after drop.
        let _lock2 = FileLock::acquire_exclusive(&lock_path).unwrap();
    }

    #[test]
    fn same_path_locks_serialize_within_process() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("repo.lock");
        let first = FileLock::acquire_exclusive(&lock_path).unwrap();
        drop(first);
        let second = FileLock::acquire_exclusive(&lock_path).unwrap();
        drop(second);
    }
}
