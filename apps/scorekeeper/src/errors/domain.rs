//! Domain-level error type used by the engine, the reducer and the store.
//!
//! This error type is UI-agnostic. Validation and not-found errors are
//! detected before state is touched, so receiving one means nothing was
//! committed. Storage errors come from the persistence backends.
//! Collaborators present errors using [`DomainError::code`] and the
//! `Display` message.

use thiserror::Error;

use super::error_code::ErrorCode;

/// Validation and business rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// No entry in the round qualifies as the winner.
    NoWinner,
    /// More than one entry qualifies as the winner.
    AmbiguousWinner,
    /// The caller named a winner that the entries do not support.
    WinnerMismatch,
    /// A round needs at least two players.
    InsufficientPlayers,
    /// A player appears twice in an edited round.
    DuplicateEntry,
    /// Card quantity outside 1..=4.
    InvalidQuantity,
    /// Target score outside the allowed set.
    InvalidTargetPoints,
    /// Player name is blank.
    EmptyName,
    /// Round lifecycle operation not allowed in the current phase.
    PhaseMismatch,
    /// Loaded or derived state breaks a model invariant.
    InvariantViolation,
}

/// Missing resources in domain terms.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Round,
    Player,
}

/// Persistence failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    Read,
    Write,
    /// The stored blob could not be decoded or breaks an invariant.
    Corrupt,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input validation or rule violation
    #[error("validation error {0:?}: {1}")]
    Validation(ValidationKind, String),
    /// Missing round or player
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    /// Persistence failures
    #[error("storage {0:?}: {1}")]
    Storage(StorageErrorKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn storage(kind: StorageErrorKind, detail: impl Into<String>) -> Self {
        Self::Storage(kind, detail.into())
    }

    pub fn round_not_found(index: usize, rounds: usize) -> Self {
        Self::not_found(
            NotFoundKind::Round,
            format!("round index {index} out of bounds ({rounds} rounds recorded)"),
        )
    }

    pub fn player_not_found(id: impl std::fmt::Display) -> Self {
        Self::not_found(NotFoundKind::Player, format!("no player with id {id}"))
    }

    pub fn phase_mismatch(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::PhaseMismatch, detail)
    }

    /// Stable code for presentation layers.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::NoWinner => ErrorCode::NoWinner,
                ValidationKind::AmbiguousWinner => ErrorCode::AmbiguousWinner,
                ValidationKind::WinnerMismatch => ErrorCode::WinnerMismatch,
                ValidationKind::InsufficientPlayers => ErrorCode::InsufficientPlayers,
                ValidationKind::DuplicateEntry => ErrorCode::DuplicateEntry,
                ValidationKind::InvalidQuantity => ErrorCode::InvalidQuantity,
                ValidationKind::InvalidTargetPoints => ErrorCode::InvalidTargetPoints,
                ValidationKind::EmptyName => ErrorCode::EmptyName,
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::InvariantViolation => ErrorCode::InvariantViolation,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Round => ErrorCode::RoundNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
            },
            DomainError::Storage(kind, _) => match kind {
                StorageErrorKind::Read => ErrorCode::StorageRead,
                StorageErrorKind::Write => ErrorCode::StorageWrite,
                StorageErrorKind::Corrupt => ErrorCode::StorageCorrupt,
            },
        }
    }

    /// Kind accessor used heavily by tests and the CLI.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            DomainError::NotFound(..) | DomainError::Storage(..) => None,
        }
    }
}
