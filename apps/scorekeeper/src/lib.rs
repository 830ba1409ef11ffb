#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod bin_support;
pub mod config;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod store;

// Re-exports for public API
pub use config::{AppConfig, ConfigError};
pub use domain::{reduce, Action, GameState};
pub use errors::{DomainError, ErrorCode};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::Store;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    scorekeeper_test_support::logging::init();
}
