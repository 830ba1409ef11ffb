//! JSON file storage.
//!
//! Writes go to `<path>.tmp` and are renamed over `<path>` while an OS-level
//! exclusive lock is held on `<path>.lock`, so concurrent processes never
//! interleave writes and readers never see a half-written blob.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::Storage;
use crate::errors::domain::{DomainError, StorageErrorKind};

const LOCK_ATTEMPTS: u32 = 50;
const LOCK_BACKOFF: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn ensure_parent(&self) -> Result<(), DomainError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| {
                    write_error(format!(
                        "failed to create state directory {}: {e}",
                        parent.display()
                    ))
                })
            }
            _ => Ok(()),
        }
    }

    /// Hold the exclusive lock for the lifetime of the returned file.
    fn acquire_lock(&self) -> Result<File, DomainError> {
        use fs4::fs_std::FileExt;

        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| write_error(format!("failed to open lock file: {e}")))?;

        for attempt in 1..=LOCK_ATTEMPTS {
            // Ok(false) means another process holds the lock.
            match file.try_lock_exclusive() {
                Ok(true) => {
                    debug!(lock_path = %lock_path.display(), attempt, "State file lock acquired");
                    return Ok(file);
                }
                Ok(false) => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => {
                    return Err(write_error(format!("failed to lock state file: {e}")));
                }
            }
            debug!(lock_path = %lock_path.display(), attempt, "State file lock contended");
            thread::sleep(LOCK_BACKOFF);
        }
        Err(write_error(format!(
            "state file {} is locked by another process",
            self.path.display()
        )))
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<String>, DomainError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::storage(
                StorageErrorKind::Read,
                format!("failed to read {}: {e}", self.path.display()),
            )),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), DomainError> {
        self.ensure_parent()?;
        let _lock = self.acquire_lock()?;

        let tmp = self.sibling(".tmp");
        let mut file = File::create(&tmp)
            .map_err(|e| write_error(format!("failed to create {}: {e}", tmp.display())))?;
        file.write_all(blob.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| write_error(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            write_error(format!(
                "failed to move {} into place: {e}",
                tmp.display()
            ))
        })?;
        debug!(path = %self.path.display(), bytes = blob.len(), "State saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DomainError> {
        if !self.path.exists() {
            return Ok(());
        }
        let _lock = self.acquire_lock()?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_error(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

fn write_error(detail: String) -> DomainError {
    DomainError::storage(StorageErrorKind::Write, detail)
}
