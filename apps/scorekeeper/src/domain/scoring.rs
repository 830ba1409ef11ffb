//! Round resolution: winner identification, winner subtraction, and
//! cumulative totals.
//!
//! Everything here is pure apart from `tracing` events. Functions that can
//! fail validate before they touch their `&mut` arguments, so an `Err`
//! always leaves players and rounds exactly as they were.

use std::collections::HashSet;

use time::OffsetDateTime;
use tracing::debug;

use super::ids::{PlayerId, RoundId};
use super::player::Player;
use super::round::{PlayerPoints, Round};
use super::settings::{GameSettings, SubtractType};
use crate::errors::domain::{DomainError, ValidationKind};

/// Percent-based subtractions below this are dropped.
pub const MIN_PERCENT_SUBTRACTION: u32 = 10;

/// Fold repeated entries for the same player into one, keeping first-seen order.
pub fn merge_entries(entries: Vec<PlayerPoints>) -> Vec<PlayerPoints> {
    let mut merged: Vec<PlayerPoints> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.iter_mut().find(|m| m.player_id == entry.player_id) {
            Some(existing) => existing.absorb(entry),
            None => merged.push(entry),
        }
    }
    merged
}

/// One entry per roster player, in roster order. Players without an entry
/// get the zero entry. Entries for unknown players are rejected.
pub fn complete_entries(
    players: &[Player],
    entries: Vec<PlayerPoints>,
) -> Result<Vec<PlayerPoints>, DomainError> {
    let mut entries = merge_entries(entries);
    if let Some(stray) = entries
        .iter()
        .find(|e| !players.iter().any(|p| p.id == e.player_id))
    {
        return Err(DomainError::player_not_found(&stray.player_id));
    }

    let completed = players
        .iter()
        .map(|player| {
            match entries.iter().position(|e| e.player_id == player.id) {
                Some(pos) => entries.swap_remove(pos),
                None => PlayerPoints::zero(player.id.clone()),
            }
        })
        .collect();
    Ok(completed)
}

/// The single entry with no cards and no direct points.
pub fn identify_winner(entries: &[PlayerPoints]) -> Result<&PlayerPoints, DomainError> {
    let mut candidates = entries.iter().filter(|e| e.is_winner_candidate());
    let Some(winner) = candidates.next() else {
        return Err(DomainError::validation(
            ValidationKind::NoWinner,
            "no player finished the round without cards or points",
        ));
    };
    let others: Vec<&str> = candidates.map(|e| e.player_id.as_str()).collect();
    if !others.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::AmbiguousWinner,
            format!(
                "several players have no cards or points: {}, {}",
                winner.player_id,
                others.join(", ")
            ),
        ));
    }
    Ok(winner)
}

/// Amount taken off the winner's round score under the current settings.
pub fn subtraction_amount(
    settings: &GameSettings,
    entries: &[PlayerPoints],
    winner_id: &PlayerId,
) -> u32 {
    if !settings.winner_subtracts_points {
        return 0;
    }
    match settings.winner_subtract_type {
        SubtractType::Fixed => settings.winner_subtract_value,
        SubtractType::Percent => {
            let others: i64 = entries
                .iter()
                .filter(|e| &e.player_id != winner_id)
                .map(|e| i64::from(e.points))
                .sum();
            let raw = i128::from(settings.winner_subtract_value)
                * i128::from(others.max(0))
                / 100;
            let subtract = u32::try_from(raw).unwrap_or(u32::MAX);
            if subtract < MIN_PERCENT_SUBTRACTION {
                0
            } else {
                subtract
            }
        }
    }
}

/// Re-derive every entry's points, identify the winner and apply the
/// subtraction. Returns the winner id and the amount subtracted.
fn score_entries(
    entries: &mut [PlayerPoints],
    settings: &GameSettings,
) -> Result<(PlayerId, u32), DomainError> {
    let winner_id = identify_winner(entries)?.player_id.clone();
    for entry in entries.iter_mut() {
        entry.points = entry.base_points();
    }
    let subtract = subtraction_amount(settings, entries, &winner_id);
    if subtract > 0 {
        let delta = i32::try_from(subtract).unwrap_or(i32::MAX);
        for entry in entries.iter_mut().filter(|e| e.player_id == winner_id) {
            entry.points = entry.points.saturating_sub(delta);
        }
    }
    Ok((winner_id, subtract))
}

/// Turn collected entries into a finalized round.
pub fn resolve_new_round(
    players: &[Player],
    entries: Vec<PlayerPoints>,
    settings: &GameSettings,
    id: RoundId,
    timestamp: OffsetDateTime,
) -> Result<Round, DomainError> {
    let mut points = complete_entries(players, entries)?;
    let (winner_id, subtracted_amount) = score_entries(&mut points, settings)?;
    debug!(
        round_id = %id,
        winner_id = %winner_id,
        subtracted_amount,
        "Round resolved"
    );
    Ok(Round {
        id,
        winner_id,
        points,
        subtracted_amount,
        timestamp,
    })
}

/// Append a resolved round and add each player's contribution.
pub fn apply_round(players: &mut [Player], rounds: &mut Vec<Round>, round: Round) {
    for player in players.iter_mut() {
        player.points = player.points.saturating_add(round.contribution(&player.id));
    }
    rounds.push(round);
}

/// Replay the full history to get authoritative totals.
pub fn recompute_from_history(players: &mut [Player], rounds: &[Round]) {
    for player in players.iter_mut() {
        player.points = rounds.iter().fold(player.starting_points, |acc, round| {
            acc.saturating_add(round.contribution(&player.id))
        });
    }
}

/// Replace the entries of the round at `index` and recompute every total.
///
/// The entries are taken as given (no zero-entry completion); the round
/// keeps its id and timestamp.
pub fn edit_round(
    players: &mut [Player],
    rounds: &mut [Round],
    index: usize,
    entries: Vec<PlayerPoints>,
    settings: &GameSettings,
) -> Result<(), DomainError> {
    let original = rounds
        .get(index)
        .ok_or_else(|| DomainError::round_not_found(index, rounds.len()))?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(&entry.player_id) {
            return Err(DomainError::validation(
                ValidationKind::DuplicateEntry,
                format!("player {} appears more than once", entry.player_id),
            ));
        }
        let known = players.iter().any(|p| p.id == entry.player_id)
            || original.entry_for(&entry.player_id).is_some();
        if !known {
            return Err(DomainError::player_not_found(&entry.player_id));
        }
    }

    let mut points = entries;
    let (winner_id, subtracted_amount) = score_entries(&mut points, settings)?;
    debug!(
        round_index = index,
        round_id = %original.id,
        winner_id = %winner_id,
        subtracted_amount,
        "Round edited"
    );

    let round = &mut rounds[index];
    round.winner_id = winner_id;
    round.points = points;
    round.subtracted_amount = subtracted_amount;

    recompute_from_history(players, rounds);
    Ok(())
}

/// Drop the most recent round and recompute totals.
pub fn undo_last_round(
    players: &mut [Player],
    rounds: &mut Vec<Round>,
) -> Result<Round, DomainError> {
    let last = rounds
        .pop()
        .ok_or_else(|| DomainError::round_not_found(0, 0))?;
    recompute_from_history(players, rounds);
    Ok(last)
}
