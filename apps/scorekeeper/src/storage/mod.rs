//! Persistence backends for the serialized game blob.
//!
//! A backend only moves strings; encoding and legacy import live in
//! [`blob`]. Failures surface as [`DomainError::Storage`].

pub mod blob;
pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::domain::DomainError;

/// Where the game blob lives between runs.
pub trait Storage {
    /// The stored blob, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>, DomainError>;

    /// Overwrite the stored blob.
    fn save(&mut self, blob: &str) -> Result<(), DomainError>;

    /// Forget the stored blob.
    fn clear(&mut self) -> Result<(), DomainError>;
}
