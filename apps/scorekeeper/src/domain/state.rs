//! The authoritative game state and its invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ids::PlayerId;
use super::player::{Player, PlayerView};
use super::round::Round;
use super::round_flow::RoundDraft;
use super::scoring::recompute_from_history;
use super::settings::GameSettings;
use crate::errors::domain::{DomainError, ValidationKind};

/// Players, the shared round history, settings and the in-flight round.
///
/// Rounds are stored once; a player's history is the [`PlayerView`] over
/// `rounds`, so every player always sees the same sequence of round ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(flatten)]
    pub draft: RoundDraft,
}

impl GameState {
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn require_player(&self, id: &PlayerId) -> Result<&Player, DomainError> {
        self.player(id).ok_or_else(|| DomainError::player_not_found(id))
    }

    pub fn player_view(&self, id: &PlayerId) -> Option<PlayerView<'_>> {
        self.player(id).map(|player| PlayerView {
            player,
            rounds: &self.rounds,
        })
    }

    pub fn player_views(&self) -> Vec<PlayerView<'_>> {
        self.players
            .iter()
            .map(|player| PlayerView {
                player,
                rounds: &self.rounds,
            })
            .collect()
    }

    /// First player in roster order at or above the target score.
    pub fn winner(&self) -> Option<&Player> {
        let target = i64::from(self.settings.target_points.value());
        self.players
            .iter()
            .find(|p| i64::from(p.points) >= target)
    }

    /// Players by descending total; ties stay in roster order.
    pub fn standings(&self) -> Vec<&Player> {
        let mut ordered: Vec<&Player> = self.players.iter().collect();
        ordered.sort_by(|a, b| b.points.cmp(&a.points));
        ordered
    }

    pub fn require_enough_players(&self) -> Result<(), DomainError> {
        if self.players.len() < 2 {
            return Err(DomainError::validation(
                ValidationKind::InsufficientPlayers,
                format!("a round needs at least 2 players, have {}", self.players.len()),
            ));
        }
        Ok(())
    }

    /// Check the model invariants: unique ids, one entry per player per
    /// round, exactly one winner entry per round, and totals matching the
    /// history.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut player_ids = HashSet::new();
        for player in &self.players {
            if !player_ids.insert(&player.id) {
                return Err(invariant(format!("duplicate player id {}", player.id)));
            }
        }

        let mut round_ids = HashSet::new();
        for (index, round) in self.rounds.iter().enumerate() {
            if !round_ids.insert(&round.id) {
                return Err(invariant(format!("duplicate round id {}", round.id)));
            }
            check_round(index, round)?;
        }

        for view in self.player_views() {
            let expected = view
                .round_points()
                .into_iter()
                .fold(view.player.starting_points, i32::saturating_add);
            if expected != view.player.points {
                return Err(invariant(format!(
                    "player {} total {} does not match history {}",
                    view.player.id, view.player.points, expected
                )));
            }
        }
        Ok(())
    }

    /// Bring freshly loaded state into shape: winner ids follow the winner
    /// entry, totals are replayed from history, then everything is validated.
    pub fn normalized(mut self) -> Result<GameState, DomainError> {
        for (index, round) in self.rounds.iter_mut().enumerate() {
            let derived = {
                let mut candidates = round.winner_candidates();
                match (candidates.next(), candidates.next()) {
                    (Some(only), None) if only.player_id != round.winner_id => {
                        Some(only.player_id.clone())
                    }
                    _ => None,
                }
            };
            if let Some(derived) = derived {
                warn!(
                    round_index = index,
                    stored = %round.winner_id,
                    derived = %derived,
                    "Stored winner disagrees with round entries; using entries"
                );
                round.winner_id = derived;
            }
        }
        recompute_from_history(&mut self.players, &self.rounds);
        self.validate()?;
        Ok(self)
    }
}

fn check_round(index: usize, round: &Round) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for entry in &round.points {
        if !seen.insert(&entry.player_id) {
            return Err(invariant(format!(
                "round {index} has two entries for player {}",
                entry.player_id
            )));
        }
    }
    let candidates: Vec<&PlayerId> = round.winner_candidates().map(|p| &p.player_id).collect();
    match candidates.as_slice() {
        [only] if **only == round.winner_id => Ok(()),
        [only] => Err(invariant(format!(
            "round {index} winner {} does not match winner entry {only}",
            round.winner_id
        ))),
        others => Err(invariant(format!(
            "round {index} has {} winner entries",
            others.len()
        ))),
    }
}

fn invariant(detail: String) -> DomainError {
    DomainError::validation(ValidationKind::InvariantViolation, detail)
}
