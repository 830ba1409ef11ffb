//! Execute a parsed command against the store and produce its output.

use tracing::warn;

use crate::domain::{PlayerId, PlayerPoints, SettingsPatch, TargetPoints};
use crate::errors::DomainError;
use crate::storage::Storage;
use crate::store::Store;

use super::cli::{Command, SettingsArgs};
use super::entries::{parse_entry, resolve_player, EntrySpec};
use super::error::CliError;
use super::render::{render_cards, render_state, round_line, settings_line};

pub fn run<S: Storage>(store: &mut Store<S>, command: Command) -> Result<String, CliError> {
    match command {
        Command::Show => Ok(render_state(store.state())),
        Command::AddPlayer { name } => {
            let id = store.add_player(&name)?;
            Ok(format!("Added {} ({id})", name.trim()))
        }
        Command::RemovePlayer { player } => {
            let id = resolve_player(store.state(), &player)?;
            let name = player_name(store, &id);
            store.remove_player(&id)?;
            Ok(format!("Removed {name}"))
        }
        Command::RenamePlayer { player, name } => {
            let id = resolve_player(store.state(), &player)?;
            let old = player_name(store, &id);
            store.update_player_name(&id, &name)?;
            Ok(format!("Renamed {old} to {}", player_name(store, &id)))
        }
        Command::Settings(args) => {
            let patch = settings_patch(args)?;
            if !patch.is_empty() {
                store.update_settings(patch)?;
            }
            Ok(format!("Settings: {}", settings_line(&store.state().settings)))
        }
        Command::Round { winner, entries } => record_round(store, winner.as_deref(), &entries),
        Command::EditRound { round, entries } => edit_round(store, round, &entries),
        Command::Undo => {
            let round = store.undo_last_round()?;
            Ok(format!(
                "Removed round {} (won by {})\n\n{}",
                round.id,
                player_name(store, &round.winner_id),
                render_state(store.state())
            ))
        }
        Command::NewGame => {
            store.new_game()?;
            Ok("New game started. Scores are back to zero.".to_owned())
        }
        Command::Reset => {
            store.reset()?;
            Ok("Everything was reset.".to_owned())
        }
        Command::Cards => Ok(render_cards()),
    }
}

fn player_name<S: Storage>(store: &Store<S>, id: &PlayerId) -> String {
    store
        .get_player_by_id(id)
        .map_or_else(|| id.to_string(), |p| p.name.clone())
}

fn settings_patch(args: SettingsArgs) -> Result<SettingsPatch, CliError> {
    let target_points = args.target.map(TargetPoints::try_from).transpose()?;
    Ok(SettingsPatch {
        target_points,
        theme: args.theme.map(Into::into),
        winner_subtracts_points: args.winner_subtracts,
        winner_subtract_type: args.subtract_type.map(Into::into),
        winner_subtract_value: args.subtract_value,
        new_player_initial_score: args.initial_score.map(Into::into),
    })
}

/// Parse every entry and resolve its player before anything is dispatched.
fn resolve_entries<S: Storage>(
    store: &Store<S>,
    raw: &[String],
) -> Result<Vec<(PlayerId, EntrySpec)>, CliError> {
    raw.iter()
        .map(|r| {
            let spec = parse_entry(r)?;
            let id = resolve_player(store.state(), &spec.player)?;
            Ok((id, spec))
        })
        .collect()
}

fn record_round<S: Storage>(
    store: &mut Store<S>,
    winner: Option<&str>,
    raw: &[String],
) -> Result<String, CliError> {
    let entries = resolve_entries(store, raw)?;
    match winner {
        Some(token) => {
            let winner_id = resolve_player(store.state(), token)?;
            let points = entries
                .into_iter()
                .map(|(id, spec)| PlayerPoints::new(id, spec.cards, spec.direct_points))
                .collect();
            store.add_round(&winner_id, points)?;
        }
        None => {
            discard_stale_draft(store)?;
            store.begin_round()?;
            fill_and_confirm(store, entries)?;
        }
    }
    Ok(summary(store, store.state().rounds.len()))
}

fn edit_round<S: Storage>(
    store: &mut Store<S>,
    number: usize,
    raw: &[String],
) -> Result<String, CliError> {
    let entries = resolve_entries(store, raw)?;
    let index = number
        .checked_sub(1)
        .ok_or_else(|| DomainError::round_not_found(0, store.state().rounds.len()))?;
    discard_stale_draft(store)?;
    store.begin_edit(index)?;
    fill_and_confirm(store, entries)?;
    Ok(summary(store, number))
}

/// A draft left behind by an interrupted run would block the next round.
fn discard_stale_draft<S: Storage>(store: &mut Store<S>) -> Result<(), DomainError> {
    if store.state().draft.is_idle() {
        return Ok(());
    }
    warn!(phase = ?store.state().draft.phase, "Discarding unfinished round");
    store.cancel_round()
}

/// Enter every entry into the open draft and confirm it. On failure the
/// draft is cancelled so no half-entered round is left behind.
fn fill_and_confirm<S: Storage>(
    store: &mut Store<S>,
    entries: Vec<(PlayerId, EntrySpec)>,
) -> Result<(), DomainError> {
    let result = entries
        .into_iter()
        .try_for_each(|(id, spec)| {
            store.select_player(&id)?;
            store.enter_points(spec.cards, spec.direct_points)
        })
        .and_then(|()| store.confirm_round());
    if result.is_err() {
        if let Err(e) = store.cancel_round() {
            warn!(error = %e, "Failed to cancel unfinished round");
        }
    }
    result
}

fn summary<S: Storage>(store: &Store<S>, number: usize) -> String {
    let state = store.state();
    let round = state
        .rounds
        .get(number.saturating_sub(1))
        .map(|r| round_line(state, number, r))
        .unwrap_or_default();
    format!("Recorded round:\n{round}\n\n{}", render_state(state))
}
