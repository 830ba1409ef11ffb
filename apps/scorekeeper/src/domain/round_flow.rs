//! In-flight round buffer and its lifecycle.
//!
//! ```text
//! Idle -> SelectingPlayer -> EnteringPoints -> ReadyToConfirm -> (commit) Idle
//!                 ^                                  |
//!                 +------------ select more ---------+
//! ```
//! Editing a committed round enters at `ReadyToConfirm` with the round's
//! entries pre-loaded. Cancelling from any phase returns to `Idle` and
//! discards the buffer without touching history.

use serde::{Deserialize, Serialize};

use super::cards::CardSelection;
use super::ids::{PlayerId, RoundId};
use super::round::{PlayerPoints, Round};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RoundPhase {
    #[default]
    Idle,
    SelectingPlayer,
    EnteringPoints {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },
    ReadyToConfirm,
}

/// What a confirmed draft commits to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoundTarget {
    #[default]
    New,
    Edit {
        #[serde(rename = "roundIndex")]
        round_index: usize,
    },
}

/// Pending-round state persisted alongside the game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDraft {
    #[serde(default)]
    pub current_round_id: Option<RoundId>,
    #[serde(default)]
    pub pending_points: Vec<PlayerPoints>,
    #[serde(default)]
    pub phase: RoundPhase,
    #[serde(default)]
    pub target: RoundTarget,
}

impl RoundDraft {
    pub fn is_idle(&self) -> bool {
        self.phase == RoundPhase::Idle
    }

    /// Back to `Idle` with an empty buffer.
    pub fn clear(&mut self) {
        *self = RoundDraft::default();
    }

    pub fn begin_new(&mut self, round_id: RoundId) -> Result<(), DomainError> {
        self.require_idle("begin a round")?;
        *self = RoundDraft {
            current_round_id: Some(round_id),
            pending_points: Vec::new(),
            phase: RoundPhase::SelectingPlayer,
            target: RoundTarget::New,
        };
        Ok(())
    }

    pub fn begin_edit(&mut self, round_index: usize, round: &Round) -> Result<(), DomainError> {
        self.require_idle("edit a round")?;
        *self = RoundDraft {
            current_round_id: Some(round.id.clone()),
            pending_points: round.points.clone(),
            phase: RoundPhase::ReadyToConfirm,
            target: RoundTarget::Edit { round_index },
        };
        Ok(())
    }

    pub fn select_player(&mut self, player_id: PlayerId) -> Result<(), DomainError> {
        match self.phase {
            RoundPhase::SelectingPlayer | RoundPhase::ReadyToConfirm => {
                self.phase = RoundPhase::EnteringPoints { player_id };
                Ok(())
            }
            _ => Err(DomainError::phase_mismatch(format!(
                "cannot select a player while {:?}",
                self.phase
            ))),
        }
    }

    /// Record the selected player's cards, replacing any earlier entry.
    pub fn enter_points(
        &mut self,
        cards: Vec<CardSelection>,
        direct_points: u32,
    ) -> Result<(), DomainError> {
        let RoundPhase::EnteringPoints { player_id } = &self.phase else {
            return Err(DomainError::phase_mismatch(format!(
                "no player selected for point entry ({:?})",
                self.phase
            )));
        };
        let entry = PlayerPoints::new(player_id.clone(), cards, direct_points);
        match self
            .pending_points
            .iter_mut()
            .find(|p| p.player_id == entry.player_id)
        {
            Some(existing) => *existing = entry,
            None => self.pending_points.push(entry),
        }
        self.phase = RoundPhase::ReadyToConfirm;
        Ok(())
    }

    /// Raw buffer replacement.
    pub fn set_pending(&mut self, entries: Vec<PlayerPoints>) {
        self.pending_points = entries;
        self.settle_phase();
    }

    pub fn clear_pending(&mut self) {
        self.pending_points.clear();
        self.settle_phase();
    }

    /// Drop buffered work that refers to a removed player. An edit keeps the
    /// player's historical entry.
    pub fn forget_player(&mut self, player_id: &PlayerId) {
        if self.target == RoundTarget::New {
            self.pending_points.retain(|p| &p.player_id != player_id);
        }
        if matches!(&self.phase, RoundPhase::EnteringPoints { player_id: p } if p == player_id) {
            self.phase = RoundPhase::SelectingPlayer;
        }
        self.settle_phase();
    }

    pub fn require_ready(&self) -> Result<(), DomainError> {
        if self.phase == RoundPhase::ReadyToConfirm {
            Ok(())
        } else {
            Err(DomainError::phase_mismatch(format!(
                "round is not ready to confirm ({:?})",
                self.phase
            )))
        }
    }

    pub fn require_active(&self) -> Result<(), DomainError> {
        if self.is_idle() {
            Err(DomainError::phase_mismatch("no round in progress"))
        } else {
            Ok(())
        }
    }

    fn require_idle(&self, what: &str) -> Result<(), DomainError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(DomainError::phase_mismatch(format!(
                "cannot {what} while another is in progress ({:?})",
                self.phase
            )))
        }
    }

    // Selection and confirmation phases track whether anything is buffered.
    fn settle_phase(&mut self) {
        if matches!(
            self.phase,
            RoundPhase::SelectingPlayer | RoundPhase::ReadyToConfirm
        ) {
            self.phase = if self.pending_points.is_empty() {
                RoundPhase::SelectingPlayer
            } else {
                RoundPhase::ReadyToConfirm
            };
        }
    }
}
