//! Encoding of [`GameState`] to and from the stored JSON blob.
//!
//! Two shapes are readable:
//! - the current one, with a single top-level `rounds` list;
//! - the legacy one, where every player carries its own copy of the round
//!   history under `players[].rounds`.
//!
//! Both go through [`GameState::normalized`] so totals are always replayed
//! from history on load.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    GameSettings, GameState, Player, PlayerId, PlayerPoints, Round, RoundDraft, RoundId,
};
use crate::errors::domain::{DomainError, StorageErrorKind};

pub fn encode(state: &GameState) -> Result<String, DomainError> {
    serde_json::to_string_pretty(state).map_err(|e| {
        DomainError::storage(StorageErrorKind::Write, format!("failed to encode state: {e}"))
    })
}

/// Decode either blob shape into a validated state.
pub fn decode(blob: &str) -> Result<GameState, DomainError> {
    let value: Value = serde_json::from_str(blob).map_err(corrupt)?;
    let state = if is_legacy(&value) {
        debug!("Importing per-player round history");
        let legacy: LegacyBlob = serde_json::from_value(value).map_err(corrupt)?;
        legacy.into_state()?
    } else {
        serde_json::from_value::<GameState>(value).map_err(corrupt)?
    };
    state.normalized().map_err(|e| {
        DomainError::storage(
            StorageErrorKind::Corrupt,
            format!("stored state is inconsistent: {e}"),
        )
    })
}

/// Decode, falling back to the default state on anything unreadable.
pub fn decode_or_default(blob: &str) -> GameState {
    decode(blob).unwrap_or_else(|e| {
        warn!(error = %e, code = %e.code(), "Discarding unreadable saved state");
        GameState::default()
    })
}

fn is_legacy(value: &Value) -> bool {
    if value.get("rounds").is_some() {
        return false;
    }
    value
        .get("players")
        .and_then(Value::as_array)
        .is_some_and(|players| players.iter().any(|p| p.get("rounds").is_some()))
}

fn corrupt(e: serde_json::Error) -> DomainError {
    DomainError::storage(StorageErrorKind::Corrupt, format!("malformed state blob: {e}"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBlob {
    #[serde(default)]
    players: Vec<LegacyPlayer>,
    #[serde(default)]
    settings: GameSettings,
    #[serde(default)]
    pending_points: Vec<PlayerPoints>,
    #[serde(default)]
    current_round_id: Option<RoundId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyPlayer {
    id: PlayerId,
    name: String,
    #[serde(default)]
    points: i32,
    #[serde(default)]
    rounds: Vec<Round>,
}

impl LegacyBlob {
    fn into_state(self) -> Result<GameState, DomainError> {
        let rounds = self.shared_rounds()?;

        let mut players = Vec::with_capacity(self.players.len());
        for legacy in &self.players {
            let history = rounds
                .iter()
                .fold(0i32, |acc, r| acc.saturating_add(r.contribution(&legacy.id)));
            // Whatever the stored total holds beyond its history is carry-over.
            let starting_points = legacy.points.saturating_sub(history);
            let player = Player::new(legacy.id.clone(), &legacy.name, starting_points)
                .map_err(|e| DomainError::storage(StorageErrorKind::Corrupt, e.to_string()))?;
            players.push(player);
        }

        Ok(GameState {
            players,
            rounds,
            settings: self.settings,
            draft: RoundDraft {
                current_round_id: self.current_round_id,
                pending_points: self.pending_points,
                ..RoundDraft::default()
            },
        })
    }

    /// Collapse the per-player copies into one history.
    fn shared_rounds(&self) -> Result<Vec<Round>, DomainError> {
        let Some(first) = self.players.first() else {
            return Ok(Vec::new());
        };
        let ids: Vec<&RoundId> = first.rounds.iter().map(|r| &r.id).collect();
        for other in &self.players[1..] {
            let other_ids: Vec<&RoundId> = other.rounds.iter().map(|r| &r.id).collect();
            if other_ids != ids {
                return Err(DomainError::storage(
                    StorageErrorKind::Corrupt,
                    format!(
                        "player {} has round history {:?}, player {} has {:?}",
                        first.id, ids, other.id, other_ids
                    ),
                ));
            }
        }

        let mut rounds = first.rounds.clone();
        for (index, round) in rounds.iter_mut().enumerate() {
            for other in &self.players[1..] {
                for entry in &other.rounds[index].points {
                    if round.entry_for(&entry.player_id).is_none() {
                        round.points.push(entry.clone());
                    }
                }
            }
            drop_backfilled_entries(round);
        }
        Ok(rounds)
    }
}

/// Late joiners got zero entries copied into earlier rounds, which look
/// like extra winners. Keep only the one matching `winner_id`.
fn drop_backfilled_entries(round: &mut Round) {
    let candidates = round.winner_candidates().count();
    let winner_listed = round
        .winner_candidates()
        .any(|p| p.player_id == round.winner_id);
    if candidates > 1 && winner_listed {
        let winner_id = round.winner_id.clone();
        round
            .points
            .retain(|p| !p.is_winner_candidate() || p.player_id == winner_id);
    }
}
