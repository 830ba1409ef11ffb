//! Roster entries and the per-player read view.

use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use super::round::Round;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cumulative total: `starting_points` plus every round contribution.
    pub points: i32,
    /// Carry-over assigned when the player joined a game in progress.
    #[serde(default)]
    pub starting_points: i32,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, starting_points: i32) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            points: starting_points,
            starting_points,
        })
    }
}

/// Trimmed, non-empty player name.
pub fn normalize_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyName,
            "player name must not be blank",
        ));
    }
    Ok(trimmed.to_owned())
}

/// A player together with the shared round history, as collaborators read it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView<'a> {
    pub player: &'a Player,
    pub rounds: &'a [Round],
}

impl PlayerView<'_> {
    /// This player's contribution in each round, in order.
    pub fn round_points(&self) -> Vec<i32> {
        self.rounds
            .iter()
            .map(|r| r.contribution(&self.player.id))
            .collect()
    }

    pub fn rounds_won(&self) -> usize {
        self.rounds
            .iter()
            .filter(|r| r.winner_id == self.player.id)
            .count()
    }
}
