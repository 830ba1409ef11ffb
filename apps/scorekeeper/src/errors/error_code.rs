//! Error codes surfaced to collaborators.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and are what the command line
//! prints next to a failure message.

use core::fmt;

/// Centralized error codes for the scorekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Round resolution
    /// No player qualifies as the round winner
    NoWinner,
    /// Several players qualify as the round winner
    AmbiguousWinner,
    /// Named winner disagrees with the entries
    WinnerMismatch,
    /// Fewer than two players
    InsufficientPlayers,
    /// Same player entered twice
    DuplicateEntry,

    // Input validation
    /// Card quantity out of range
    InvalidQuantity,
    /// Target score not allowed
    InvalidTargetPoints,
    /// Blank player name
    EmptyName,
    /// Operation not allowed in the current round phase
    PhaseMismatch,
    /// State breaks a model invariant
    InvariantViolation,

    // Lookups
    /// Round index does not exist
    RoundNotFound,
    /// Player id does not exist
    PlayerNotFound,

    // Persistence and setup
    /// Persisted state could not be read
    StorageRead,
    /// State could not be persisted
    StorageWrite,
    /// Persisted state is not a valid game
    StorageCorrupt,
    /// Invalid configuration
    ConfigError,
    /// Malformed command-line input
    BadInput,
}

impl ErrorCode {
    /// Returns the canonical string representation of this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoWinner => "NO_WINNER",
            Self::AmbiguousWinner => "AMBIGUOUS_WINNER",
            Self::WinnerMismatch => "WINNER_MISMATCH",
            Self::InsufficientPlayers => "INSUFFICIENT_PLAYERS",
            Self::DuplicateEntry => "DUPLICATE_ENTRY",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidTargetPoints => "INVALID_TARGET_POINTS",
            Self::EmptyName => "EMPTY_NAME",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::StorageRead => "STORAGE_READ",
            Self::StorageWrite => "STORAGE_WRITE",
            Self::StorageCorrupt => "STORAGE_CORRUPT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::BadInput => "BAD_INPUT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
