//! In-process storage for tests and embedding.

use std::sync::{Arc, Mutex, MutexGuard};

use super::Storage;
use crate::errors::domain::{DomainError, StorageErrorKind};

#[derive(Debug, Default)]
struct Inner {
    blob: Option<String>,
    fail_writes: bool,
    saves: usize,
}

/// Shared in-memory blob. Clones see the same contents, so a test can keep
/// a handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.blob = Some(blob.into());
        }
        storage
    }

    /// Make every following `save` and `clear` fail with a write error.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Current blob, for assertions.
    pub fn blob(&self) -> Option<String> {
        self.inner.lock().ok().and_then(|inner| inner.blob.clone())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.saves).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner.lock().map_err(|_| {
            DomainError::storage(StorageErrorKind::Read, "memory storage lock poisoned")
        })
    }

    fn writable(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        let inner = self.lock()?;
        if inner.fail_writes {
            return Err(DomainError::storage(
                StorageErrorKind::Write,
                "memory storage is read-only",
            ));
        }
        Ok(inner)
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, DomainError> {
        Ok(self.lock()?.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), DomainError> {
        let mut inner = self.writable()?;
        inner.blob = Some(blob.to_owned());
        inner.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DomainError> {
        let mut inner = self.writable()?;
        inner.blob = None;
        Ok(())
    }
}
