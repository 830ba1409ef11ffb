//! The State Store: single source of truth for a game.
//!
//! Every mutation runs the pure reducer on the current state and, only if
//! it succeeds, swaps the new state in and persists it. Ids and timestamps
//! are minted here so the reducer stays deterministic.
//!
//! Persistence failures are not fatal: the in-memory state stays
//! authoritative for the session, a warning is logged, and the failure is
//! kept in [`Store::last_save_error`] for the caller to surface.

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::domain::{
    reduce, Action, CardSelection, GameState, Player, PlayerId, PlayerPoints, PlayerView, Round,
    RoundId, SettingsPatch,
};
use crate::errors::domain::DomainError;
use crate::storage::{blob, Storage};

pub struct Store<S: Storage> {
    state: GameState,
    storage: S,
    last_save_error: Option<DomainError>,
}

impl<S: Storage> Store<S> {
    /// Load the saved game, or start fresh when nothing usable is stored.
    pub fn open(storage: S) -> Self {
        let state = match storage.load() {
            Ok(Some(saved)) => blob::decode_or_default(&saved),
            Ok(None) => GameState::default(),
            Err(e) => {
                warn!(error = %e, code = %e.code(), "Failed to read saved state; starting fresh");
                GameState::default()
            }
        };
        info!(
            players = state.players.len(),
            rounds = state.rounds.len(),
            "Game state loaded"
        );
        Self {
            state,
            storage,
            last_save_error: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The most recent persistence failure, cleared by the next good save.
    pub fn last_save_error(&self) -> Option<&DomainError> {
        self.last_save_error.as_ref()
    }

    /// Reduce, commit and persist. On `Err` nothing changed.
    pub fn dispatch(&mut self, action: Action) -> Result<(), DomainError> {
        let name = action.name();
        let next = reduce(&self.state, action)?;
        self.state = next;
        self.persist();
        info!(
            action = name,
            players = self.state.players.len(),
            rounds = self.state.rounds.len(),
            "State committed"
        );
        Ok(())
    }

    fn persist(&mut self) {
        let result = blob::encode(&self.state).and_then(|encoded| self.storage.save(&encoded));
        self.record_save(result);
    }

    fn record_save(&mut self, result: Result<(), DomainError>) {
        match result {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(
                    error = %e,
                    code = %e.code(),
                    "Failed to persist state; keeping it in memory"
                );
                self.last_save_error = Some(e);
            }
        }
    }

    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, DomainError> {
        let id = PlayerId::generate();
        self.dispatch(Action::AddPlayer {
            id: id.clone(),
            name: name.to_owned(),
        })?;
        Ok(id)
    }

    pub fn remove_player(&mut self, id: &PlayerId) -> Result<(), DomainError> {
        self.dispatch(Action::RemovePlayer { id: id.clone() })
    }

    pub fn update_player_name(&mut self, id: &PlayerId, name: &str) -> Result<(), DomainError> {
        self.dispatch(Action::RenamePlayer {
            id: id.clone(),
            name: name.to_owned(),
        })
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), DomainError> {
        self.dispatch(Action::UpdateSettings(patch))
    }

    pub fn update_pending_points(&mut self, entries: Vec<PlayerPoints>) -> Result<(), DomainError> {
        self.dispatch(Action::UpdatePendingPoints(entries))
    }

    pub fn clear_pending_points(&mut self) -> Result<(), DomainError> {
        self.dispatch(Action::ClearPendingPoints)
    }

    pub fn set_current_round_id(&mut self, id: Option<RoundId>) -> Result<(), DomainError> {
        self.dispatch(Action::SetCurrentRoundId(id))
    }

    /// Resolve and commit a round; returns the new round's id.
    pub fn add_round(
        &mut self,
        winner_id: &PlayerId,
        entries: Vec<PlayerPoints>,
    ) -> Result<RoundId, DomainError> {
        let round_id = RoundId::generate();
        self.dispatch(Action::AddRound {
            winner_id: winner_id.clone(),
            entries,
            round_id: round_id.clone(),
            timestamp: OffsetDateTime::now_utc(),
        })?;
        Ok(round_id)
    }

    pub fn edit_round(
        &mut self,
        index: usize,
        entries: Vec<PlayerPoints>,
    ) -> Result<(), DomainError> {
        self.dispatch(Action::EditRound { index, entries })
    }

    /// Drop the latest round and return it.
    pub fn undo_last_round(&mut self) -> Result<Round, DomainError> {
        let last = self
            .state
            .rounds
            .last()
            .cloned()
            .ok_or_else(|| DomainError::round_not_found(0, 0))?;
        self.dispatch(Action::UndoLastRound)?;
        Ok(last)
    }

    pub fn new_game(&mut self) -> Result<(), DomainError> {
        self.dispatch(Action::NewGame)
    }

    /// Back to the default state and forget the stored blob.
    pub fn reset(&mut self) -> Result<(), DomainError> {
        self.state = reduce(&self.state, Action::Reset)?;
        let result = self.storage.clear();
        self.record_save(result);
        info!("State reset");
        Ok(())
    }

    pub fn begin_round(&mut self) -> Result<RoundId, DomainError> {
        let round_id = RoundId::generate();
        self.dispatch(Action::BeginRound {
            round_id: round_id.clone(),
        })?;
        Ok(round_id)
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), DomainError> {
        self.dispatch(Action::BeginEdit { index })
    }

    pub fn select_player(&mut self, id: &PlayerId) -> Result<(), DomainError> {
        self.dispatch(Action::SelectPlayer { id: id.clone() })
    }

    pub fn enter_points(
        &mut self,
        cards: Vec<CardSelection>,
        direct_points: u32,
    ) -> Result<(), DomainError> {
        self.dispatch(Action::EnterPoints {
            cards,
            direct_points,
        })
    }

    /// Commit the draft round. On a validation error the draft is kept so
    /// the entries can be corrected.
    pub fn confirm_round(&mut self) -> Result<(), DomainError> {
        self.dispatch(Action::ConfirmRound {
            round_id: RoundId::generate(),
            timestamp: OffsetDateTime::now_utc(),
        })
    }

    pub fn cancel_round(&mut self) -> Result<(), DomainError> {
        self.dispatch(Action::CancelRound)
    }

    pub fn get_winner(&self) -> Option<&Player> {
        self.state.winner()
    }

    pub fn get_player_by_id(&self, id: &PlayerId) -> Option<&Player> {
        self.state.player(id)
    }

    pub fn player_view(&self, id: &PlayerId) -> Option<PlayerView<'_>> {
        self.state.player_view(id)
    }

    pub fn standings(&self) -> Vec<&Player> {
        self.state.standings()
    }
}
