//! Error handling for the scorekeeper.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, NotFoundKind, StorageErrorKind, ValidationKind};
pub use error_code::ErrorCode;
