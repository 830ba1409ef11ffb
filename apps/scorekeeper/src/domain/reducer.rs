//! Pure state transitions: `(state, action) -> state`.
//!
//! Actions carry any generated ids and timestamps so that reducing is
//! deterministic; the store is the one place that mints them.

use time::OffsetDateTime;
use tracing::debug;

use super::cards::CardSelection;
use super::ids::{PlayerId, RoundId};
use super::player::{normalize_name, Player};
use super::round::PlayerPoints;
use super::round_flow::{RoundDraft, RoundTarget};
use super::scoring;
use super::settings::{InitialScore, SettingsPatch};
use super::state::GameState;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddPlayer {
        id: PlayerId,
        name: String,
    },
    RemovePlayer {
        id: PlayerId,
    },
    RenamePlayer {
        id: PlayerId,
        name: String,
    },
    UpdateSettings(SettingsPatch),
    UpdatePendingPoints(Vec<PlayerPoints>),
    ClearPendingPoints,
    SetCurrentRoundId(Option<RoundId>),
    AddRound {
        winner_id: PlayerId,
        entries: Vec<PlayerPoints>,
        round_id: RoundId,
        timestamp: OffsetDateTime,
    },
    EditRound {
        index: usize,
        entries: Vec<PlayerPoints>,
    },
    UndoLastRound,
    /// Clear scores and history, keep the roster and settings.
    NewGame,
    /// Back to the default state.
    Reset,
    BeginRound {
        round_id: RoundId,
    },
    BeginEdit {
        index: usize,
    },
    SelectPlayer {
        id: PlayerId,
    },
    EnterPoints {
        cards: Vec<CardSelection>,
        direct_points: u32,
    },
    /// Commit the draft. `round_id` is used when the draft has none.
    ConfirmRound {
        round_id: RoundId,
        timestamp: OffsetDateTime,
    },
    CancelRound,
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPlayer { .. } => "add_player",
            Action::RemovePlayer { .. } => "remove_player",
            Action::RenamePlayer { .. } => "rename_player",
            Action::UpdateSettings(_) => "update_settings",
            Action::UpdatePendingPoints(_) => "update_pending_points",
            Action::ClearPendingPoints => "clear_pending_points",
            Action::SetCurrentRoundId(_) => "set_current_round_id",
            Action::AddRound { .. } => "add_round",
            Action::EditRound { .. } => "edit_round",
            Action::UndoLastRound => "undo_last_round",
            Action::NewGame => "new_game",
            Action::Reset => "reset",
            Action::BeginRound { .. } => "begin_round",
            Action::BeginEdit { .. } => "begin_edit",
            Action::SelectPlayer { .. } => "select_player",
            Action::EnterPoints { .. } => "enter_points",
            Action::ConfirmRound { .. } => "confirm_round",
            Action::CancelRound => "cancel_round",
        }
    }
}

/// Apply `action` to a copy of `state`.
///
/// On error the input state is untouched and nothing partial escapes.
pub fn reduce(state: &GameState, action: Action) -> Result<GameState, DomainError> {
    let mut next = state.clone();
    debug!(action = action.name(), "Reducing");
    apply(&mut next, action)?;
    Ok(next)
}

fn apply(state: &mut GameState, action: Action) -> Result<(), DomainError> {
    match action {
        Action::AddPlayer { id, name } => add_player(state, id, &name),
        Action::RemovePlayer { id } => {
            state.require_player(&id)?;
            state.players.retain(|p| p.id != id);
            state.draft.forget_player(&id);
            Ok(())
        }
        Action::RenamePlayer { id, name } => {
            let name = normalize_name(&name)?;
            let player = state
                .players
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| DomainError::player_not_found(&id))?;
            player.name = name;
            Ok(())
        }
        Action::UpdateSettings(patch) => {
            state.settings = state.settings.merged(&patch);
            Ok(())
        }
        Action::UpdatePendingPoints(entries) => {
            state.draft.set_pending(entries);
            Ok(())
        }
        Action::ClearPendingPoints => {
            state.draft.clear_pending();
            Ok(())
        }
        Action::SetCurrentRoundId(id) => {
            state.draft.current_round_id = id;
            Ok(())
        }
        Action::AddRound {
            winner_id,
            entries,
            round_id,
            timestamp,
        } => add_round(state, Some(&winner_id), entries, round_id, timestamp),
        Action::EditRound { index, entries } => edit_round(state, index, entries),
        Action::UndoLastRound => {
            scoring::undo_last_round(&mut state.players, &mut state.rounds)?;
            Ok(())
        }
        Action::NewGame => {
            for player in &mut state.players {
                player.points = 0;
                player.starting_points = 0;
            }
            state.rounds.clear();
            state.draft.clear();
            Ok(())
        }
        Action::Reset => {
            *state = GameState::default();
            Ok(())
        }
        Action::BeginRound { round_id } => {
            state.require_enough_players()?;
            state.draft.begin_new(round_id)
        }
        Action::BeginEdit { index } => {
            let round = state
                .rounds
                .get(index)
                .ok_or_else(|| DomainError::round_not_found(index, state.rounds.len()))?;
            state.draft.begin_edit(index, round)
        }
        Action::SelectPlayer { id } => {
            state.require_player(&id)?;
            state.draft.select_player(id)
        }
        Action::EnterPoints {
            cards,
            direct_points,
        } => state.draft.enter_points(cards, direct_points),
        Action::ConfirmRound {
            round_id,
            timestamp,
        } => confirm_round(state, round_id, timestamp),
        Action::CancelRound => {
            state.draft.require_active()?;
            state.draft.clear();
            Ok(())
        }
    }
}

fn add_player(state: &mut GameState, id: PlayerId, name: &str) -> Result<(), DomainError> {
    if state.player(&id).is_some() {
        return Err(DomainError::validation(
            ValidationKind::InvariantViolation,
            format!("player id {id} already exists"),
        ));
    }
    // The carry-over only applies once the game is under way.
    let starting_points = if state.rounds.is_empty() {
        0
    } else {
        let totals = state.players.iter().map(|p| p.points);
        match state.settings.new_player_initial_score {
            InitialScore::Zero => 0,
            InitialScore::Min => totals.min().unwrap_or(0),
            InitialScore::Max => totals.max().unwrap_or(0),
        }
    };
    let player = Player::new(id, name, starting_points)?;
    state.players.push(player);
    Ok(())
}

fn add_round(
    state: &mut GameState,
    expected_winner: Option<&PlayerId>,
    entries: Vec<PlayerPoints>,
    round_id: RoundId,
    timestamp: OffsetDateTime,
) -> Result<(), DomainError> {
    state.require_enough_players()?;
    let round = scoring::resolve_new_round(
        &state.players,
        entries,
        &state.settings,
        round_id,
        timestamp,
    )?;
    if let Some(expected) = expected_winner {
        if *expected != round.winner_id {
            return Err(DomainError::validation(
                ValidationKind::WinnerMismatch,
                format!(
                    "entries make {} the winner, not {expected}",
                    round.winner_id
                ),
            ));
        }
    }
    scoring::apply_round(&mut state.players, &mut state.rounds, round);
    Ok(())
}

fn edit_round(
    state: &mut GameState,
    index: usize,
    entries: Vec<PlayerPoints>,
) -> Result<(), DomainError> {
    scoring::edit_round(
        &mut state.players,
        &mut state.rounds,
        index,
        entries,
        &state.settings,
    )
}

fn confirm_round(
    state: &mut GameState,
    fallback_id: RoundId,
    timestamp: OffsetDateTime,
) -> Result<(), DomainError> {
    state.draft.require_ready()?;
    let RoundDraft {
        current_round_id,
        pending_points,
        target,
        ..
    } = state.draft.clone();

    match target {
        RoundTarget::New => {
            let round_id = current_round_id.unwrap_or(fallback_id);
            add_round(state, None, pending_points, round_id, timestamp)?;
        }
        RoundTarget::Edit { round_index } => {
            let still_there = state
                .rounds
                .get(round_index)
                .is_some_and(|round| Some(&round.id) == current_round_id.as_ref());
            if !still_there {
                return Err(DomainError::phase_mismatch(format!(
                    "round {} is no longer at position {round_index}; cancel the edit",
                    current_round_id.map_or_else(|| "?".to_owned(), |id| id.to_string())
                )));
            }
            edit_round(state, round_index, pending_points)?;
        }
    }
    state.draft.clear();
    Ok(())
}
