use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::{DomainError, ErrorCode};

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    BadInput(String),
}

impl CliError {
    pub fn bad_input(detail: impl Into<String>) -> Self {
        Self::BadInput(detail.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Domain(e) => e.code(),
            CliError::Config(e) => e.code(),
            CliError::BadInput(_) => ErrorCode::BadInput,
        }
    }
}
