//! Advisory file locking for the RSVP file.

use std::fs::File;
use std::io;

use fs2::FileExt;
use tracing::warn;

/// A file held under an advisory lock.
///
/// The lock is released when the guard is dropped, whichever way the
/// enclosing scope exits.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
}

impl LockedFile {
    /// Block until an exclusive lock on `file` is held.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn exclusive(file: File) -> io::Result<Self> {
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }

    /// Block until a shared lock on `file` is held.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn shared(file: File) -> io::Result<Self> {
        FileExt::lock_shared(&file)?;
        Ok(Self { file })
    }

    /// The locked file.
    #[must_use]
    pub fn file(&self) -> &File {
        &self.file
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(error = %e, "Failed to release RSVP storage lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;

    fn open(path: &std::path::Path) -> File {
        OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .unwrap()
    }

    #[test]
    fn test_exclusive_lock_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvps.csv");

        let guard = LockedFile::exclusive(open(&path)).unwrap();
        let other = open(&path);
        assert!(FileExt::try_lock_exclusive(&other).is_err());

        drop(guard);
        assert!(FileExt::try_lock_exclusive(&other).is_ok());
        FileExt::unlock(&other).unwrap();
    }

    #[test]
    fn test_shared_locks_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvps.csv");

        let first = LockedFile::shared(open(&path)).unwrap();
        let second = LockedFile::shared(open(&path)).unwrap();
        assert!(FileExt::try_lock_exclusive(&open(&path)).is_err());

        drop(first);
        drop(second);
        assert!(FileExt::try_lock_exclusive(&open(&path)).is_ok());
    }
}
