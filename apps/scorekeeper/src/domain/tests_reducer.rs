use crate::domain::test_state_helpers::{
    direct_entries, fixed_settings, pid, play_round, state_with, ts,
};
use crate::domain::{
    reduce, Action, CardKind, CardSelection, GameSettings, GameState, PlayerPoints, RoundId,
    RoundPhase, RoundTarget, SettingsPatch, TargetPoints,
};
use crate::errors::domain::{NotFoundKind, ValidationKind};
use crate::errors::DomainError;

fn step(state: &GameState, action: Action) -> GameState {
    reduce(state, action).expect("action applies")
}

fn confirm(state: &GameState) -> Result<GameState, DomainError> {
    reduce(
        state,
        Action::ConfirmRound {
            round_id: RoundId::from("fallback"),
            timestamp: ts(),
        },
    )
}

#[test]
fn begin_round_needs_two_players() {
    let state = state_with(1, GameSettings::default());
    let err = reduce(
        &state,
        Action::BeginRound {
            round_id: RoundId::from("r1"),
        },
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InsufficientPlayers));
    assert!(state.draft.is_idle());
}

#[test]
fn add_round_needs_two_players() {
    let state = state_with(1, GameSettings::default());
    let err = reduce(
        &state,
        Action::AddRound {
            winner_id: pid("p1"),
            entries: vec![PlayerPoints::zero(pid("p1"))],
            round_id: RoundId::from("r1"),
            timestamp: ts(),
        },
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InsufficientPlayers));
}

#[test]
fn full_round_lifecycle_commits_with_current_round_id() {
    let mut state = state_with(3, GameSettings::default());
    state = step(
        &state,
        Action::BeginRound {
            round_id: RoundId::from("r-live"),
        },
    );
    assert_eq!(state.draft.phase, RoundPhase::SelectingPlayer);

    state = step(&state, Action::SelectPlayer { id: pid("p2") });
    state = step(
        &state,
        Action::EnterPoints {
            cards: vec![CardSelection::new(CardKind::DrawTwo, 1).unwrap()],
            direct_points: 0,
        },
    );
    state = step(&state, Action::SelectPlayer { id: pid("p3") });
    state = step(
        &state,
        Action::EnterPoints {
            cards: vec![CardSelection::new(CardKind::Eight, 1).unwrap()],
            direct_points: 2,
        },
    );
    assert_eq!(state.draft.phase, RoundPhase::ReadyToConfirm);

    let state = confirm(&state).unwrap();
    assert!(state.draft.is_idle());
    assert!(state.draft.pending_points.is_empty());
    assert_eq!(state.rounds.len(), 1);
    assert_eq!(state.rounds[0].id, RoundId::from("r-live"));
    assert_eq!(state.rounds[0].winner_id, pid("p1"));
    let totals: Vec<i32> = state.players.iter().map(|p| p.points).collect();
    assert_eq!(totals, vec![0, 20, 10]);
}

#[test]
fn failed_confirm_keeps_buffer_for_correction() {
    let mut state = state_with(3, GameSettings::default());
    state = step(
        &state,
        Action::BeginRound {
            round_id: RoundId::from("r1"),
        },
    );
    state = step(&state, Action::SelectPlayer { id: pid("p2") });
    state = step(
        &state,
        Action::EnterPoints {
            cards: Vec::new(),
            direct_points: 9,
        },
    );

    // p1 and p3 both have nothing entered.
    let err = confirm(&state).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::AmbiguousWinner));
    assert_eq!(state.draft.phase, RoundPhase::ReadyToConfirm);
    assert_eq!(state.draft.pending_points.len(), 1);
    assert!(state.rounds.is_empty());
}

#[test]
fn confirm_without_ready_round_is_phase_mismatch() {
    let state = state_with(2, GameSettings::default());
    let err = confirm(&state).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn cancel_discards_buffer_only() {
    let mut state = play_round(&state_with(2, GameSettings::default()), "r1", &[0, 10]);
    state = step(
        &state,
        Action::BeginRound {
            round_id: RoundId::from("r2"),
        },
    );
    state = step(&state, Action::SelectPlayer { id: pid("p1") });
    state = step(
        &state,
        Action::EnterPoints {
            cards: Vec::new(),
            direct_points: 4,
        },
    );
    let state = step(&state, Action::CancelRound);
    assert!(state.draft.is_idle());
    assert!(state.draft.pending_points.is_empty());
    assert_eq!(state.draft.current_round_id, None);
    assert_eq!(state.rounds.len(), 1);

    let err = reduce(&state, Action::CancelRound).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn edit_flow_is_preseeded_and_recomputes() {
    let mut state = state_with(2, fixed_settings(10));
    state = play_round(&state, "r1", &[0, 30]);
    state = step(&state, Action::BeginEdit { index: 0 });
    assert_eq!(state.draft.phase, RoundPhase::ReadyToConfirm);
    assert_eq!(state.draft.target, RoundTarget::Edit { round_index: 0 });
    assert_eq!(state.draft.pending_points, state.rounds[0].points);

    state = step(&state, Action::SelectPlayer { id: pid("p2") });
    state = step(
        &state,
        Action::EnterPoints {
            cards: Vec::new(),
            direct_points: 45,
        },
    );
    let state = confirm(&state).unwrap();
    assert_eq!(state.rounds.len(), 1);
    assert_eq!(state.rounds[0].id, RoundId::from("r1"));
    let totals: Vec<i32> = state.players.iter().map(|p| p.points).collect();
    // Winner's stored -10 is re-derived, not subtracted twice.
    assert_eq!(totals, vec![-10, 45]);
}

#[test]
fn begin_edit_unknown_round() {
    let state = state_with(2, GameSettings::default());
    let err = reduce(&state, Action::BeginEdit { index: 3 }).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Round, _)));
}

#[test]
fn add_round_winner_must_match_entries() {
    let state = state_with(2, GameSettings::default());
    let err = reduce(
        &state,
        Action::AddRound {
            winner_id: pid("p2"),
            entries: direct_entries(&[0, 10]),
            round_id: RoundId::from("r1"),
            timestamp: ts(),
        },
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::WinnerMismatch));
}

#[test]
fn raw_pending_buffer_operations() {
    let mut state = state_with(2, GameSettings::default());
    state = step(
        &state,
        Action::SetCurrentRoundId(Some(RoundId::from("draft"))),
    );
    state = step(&state, Action::UpdatePendingPoints(direct_entries(&[0, 3])));
    assert_eq!(state.draft.pending_points.len(), 2);
    assert_eq!(state.draft.current_round_id, Some(RoundId::from("draft")));

    state = step(&state, Action::ClearPendingPoints);
    assert!(state.draft.pending_points.is_empty());
    state = step(&state, Action::SetCurrentRoundId(None));
    assert_eq!(state.draft.current_round_id, None);
}

#[test]
fn remove_player_keeps_history_and_prunes_pending() {
    let mut state = play_round(&state_with(3, GameSettings::default()), "r1", &[0, 10, 20]);
    state = step(&state, Action::UpdatePendingPoints(direct_entries(&[0, 5, 6])));
    state = step(&state, Action::RemovePlayer { id: pid("p1") });

    assert_eq!(state.players.len(), 2);
    assert_eq!(state.rounds[0].points.len(), 3);
    assert!(state
        .draft
        .pending_points
        .iter()
        .all(|p| p.player_id != pid("p1")));
    state.validate().unwrap();

    let err = reduce(&state, Action::RemovePlayer { id: pid("p1") }).unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
}

#[test]
fn rename_is_pure() {
    let state = play_round(&state_with(2, GameSettings::default()), "r1", &[0, 10]);
    let renamed = step(
        &state,
        Action::RenamePlayer {
            id: pid("p2"),
            name: " Bea ".into(),
        },
    );
    assert_eq!(renamed.player(&pid("p2")).unwrap().name, "Bea");
    assert_eq!(renamed.rounds, state.rounds);
    assert_eq!(renamed.player(&pid("p2")).unwrap().points, 10);

    let err = reduce(
        &state,
        Action::RenamePlayer {
            id: pid("p2"),
            name: "  ".into(),
        },
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::EmptyName));
}

#[test]
fn settings_changes_do_not_rescore_history() {
    let state = play_round(&state_with(2, GameSettings::default()), "r1", &[0, 200]);
    let state = step(
        &state,
        Action::UpdateSettings(SettingsPatch {
            winner_subtracts_points: Some(true),
            winner_subtract_value: Some(50),
            target_points: Some(TargetPoints::P300),
            ..SettingsPatch::default()
        }),
    );
    assert_eq!(state.player(&pid("p1")).unwrap().points, 0);
    assert_eq!(state.rounds[0].subtracted_amount, 0);
    assert_eq!(state.settings.target_points, TargetPoints::P300);
}

#[test]
fn new_game_keeps_roster_and_settings() {
    let mut state = play_round(&state_with(2, fixed_settings(5)), "r1", &[0, 10]);
    state = step(
        &state,
        Action::BeginRound {
            round_id: RoundId::from("r2"),
        },
    );
    let state = step(&state, Action::NewGame);
    assert_eq!(state.players.len(), 2);
    assert!(state.players.iter().all(|p| p.points == 0));
    assert!(state.rounds.is_empty());
    assert!(state.draft.is_idle());
    assert_eq!(state.settings, fixed_settings(5));
}

#[test]
fn reset_discards_everything() {
    let state = play_round(&state_with(2, fixed_settings(5)), "r1", &[0, 10]);
    let state = step(&state, Action::Reset);
    assert_eq!(state, GameState::default());
}

#[test]
fn winner_is_first_in_roster_order() {
    let mut state = state_with(3, GameSettings::default());
    state = step(
        &state,
        Action::UpdateSettings(SettingsPatch {
            target_points: Some(TargetPoints::P300),
            ..SettingsPatch::default()
        }),
    );
    state = play_round(&state, "r1", &[0, 290, 310]);
    assert_eq!(state.winner().map(|p| &p.id), Some(&pid("p3")));
    state = play_round(&state, "r2", &[0, 10, 10]);
    assert_eq!(state.winner().map(|p| &p.id), Some(&pid("p2")));
}

#[test]
fn no_winner_below_target() {
    let state = play_round(&state_with(2, GameSettings::default()), "r1", &[0, 499]);
    assert!(state.winner().is_none());
}

#[test]
fn standings_sort_descending_stable() {
    let state = play_round(&state_with(4, GameSettings::default()), "r1", &[0, 10, 30, 10]);
    let order: Vec<&str> = state.standings().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["p3", "p2", "p4", "p1"]);
}

#[test]
fn duplicate_player_id_is_rejected() {
    let state = state_with(2, GameSettings::default());
    let err = reduce(
        &state,
        Action::AddPlayer {
            id: pid("p1"),
            name: "Again".into(),
        },
    )
    .unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::InvariantViolation));
}

#[test]
fn edit_draft_is_tied_to_its_round() {
    let mut state = play_round(&state_with(3, GameSettings::default()), "r0", &[0, 10, 20]);
    state = play_round(&state, "r1", &[0, 5, 5]);
    state = step(&state, Action::BeginEdit { index: 1 });

    // The round under edit goes away and another takes its position.
    state = step(&state, Action::UndoLastRound);
    let err = confirm(&state).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));

    state = play_round(&state, "r2", &[0, 40, 40]);
    let err = confirm(&state).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::PhaseMismatch));
    assert_eq!(state.rounds[1].id, RoundId::from("r2"));
    assert_eq!(state.rounds[1].contribution(&pid("p2")), 40);
    assert_eq!(state.rounds[1].contribution(&pid("p3")), 40);

    state = step(&state, Action::CancelRound);
    assert!(state.draft.is_idle());
    state.validate().unwrap();
}

#[test]
fn removing_a_player_mid_edit_keeps_their_entry() {
    let base = play_round(&state_with(3, GameSettings::default()), "r0", &[0, 10, 20]);
    let editing = step(&base, Action::BeginEdit { index: 0 });

    let state = step(&editing, Action::RemovePlayer { id: pid("p3") });
    assert_eq!(state.draft.target, RoundTarget::Edit { round_index: 0 });
    assert_eq!(state.draft.pending_points.len(), 3);
    let state = confirm(&state).unwrap();
    assert_eq!(state.rounds[0].points.len(), 3);
    assert_eq!(state.rounds[0].contribution(&pid("p3")), 20);
    let totals: Vec<i32> = state.players.iter().map(|p| p.points).collect();
    assert_eq!(totals, vec![0, 10]);

    // Removing the round's winner still leaves a confirmable edit.
    let state = step(&editing, Action::RemovePlayer { id: pid("p1") });
    let state = confirm(&state).unwrap();
    assert_eq!(state.rounds[0].winner_id, pid("p1"));
    assert_eq!(state.rounds[0].points.len(), 3);
    state.validate().unwrap();
}
