//! Property tests for history/total consistency (pure domain, no storage).
//!
//! Contract:
//! - Every committed round has exactly one winner entry and it matches `winner_id`
//! - Each total equals starting points plus that player's round contributions
//! - Recomputing from history is idempotent
//! - Every player sees the same ordered list of round ids
//! - Percent subtraction is 0 or at least the minimum; fixed is exact

use proptest::prelude::*;

use crate::domain::scoring::MIN_PERCENT_SUBTRACTION;
use crate::domain::test_gens::{round_entries, settings as any_settings};
use crate::domain::test_prelude;
use crate::domain::test_state_helpers::{roster, ts};
use crate::domain::{
    recompute_from_history, reduce, Action, GameSettings, GameState, PlayerId, PlayerPoints,
    RoundId, SubtractType,
};

fn ids(n: usize) -> Vec<PlayerId> {
    roster(n).into_iter().map(|p| p.id).collect()
}

/// Player count plus a sequence of committable rounds for that roster.
fn game_plan(max_rounds: usize) -> impl Strategy<Value = (usize, Vec<(usize, Vec<PlayerPoints>)>)> {
    (2usize..=5usize).prop_flat_map(move |n| {
        (
            Just(n),
            prop::collection::vec(round_entries(ids(n)), 1..=max_rounds),
        )
    })
}

fn play(
    n: usize,
    settings: GameSettings,
    plan: Vec<(usize, Vec<PlayerPoints>)>,
) -> Result<GameState, TestCaseError> {
    let mut state = GameState {
        players: roster(n),
        settings,
        ..GameState::default()
    };
    for (i, (winner, entries)) in plan.into_iter().enumerate() {
        let winner_id = entries[winner].player_id.clone();
        state = reduce(
            &state,
            Action::AddRound {
                winner_id,
                entries,
                round_id: RoundId::from(format!("r{i}")),
                timestamp: ts(),
            },
        )
        .map_err(|e| TestCaseError::fail(format!("round {i} rejected: {e}")))?;
    }
    Ok(state)
}

fn assert_consistent(state: &GameState) -> Result<(), TestCaseError> {
    prop_assert!(state.validate().is_ok(), "{:?}", state.validate());
    for round in &state.rounds {
        let candidates: Vec<&PlayerId> =
            round.winner_candidates().map(|p| &p.player_id).collect();
        prop_assert_eq!(candidates, vec![&round.winner_id]);
    }
    for view in state.player_views() {
        let history: i32 = view.round_points().iter().sum();
        prop_assert_eq!(view.player.points, view.player.starting_points + history);
    }
    Ok(())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: committed rounds keep every invariant
    #[test]
    fn prop_rounds_keep_invariants(
        (n, plan) in game_plan(6),
        settings in any_settings(),
    ) {
        let state = play(n, settings, plan)?;
        assert_consistent(&state)?;
    }

    /// Property: the winner's contribution is exactly minus the subtraction
    #[test]
    fn prop_winner_contribution_is_negated_subtraction(
        (n, plan) in game_plan(4),
        settings in any_settings(),
    ) {
        let state = play(n, settings.clone(), plan)?;
        for round in &state.rounds {
            let winner = round.entry_for(&round.winner_id).expect("winner entry");
            prop_assert_eq!(i64::from(winner.points), -i64::from(round.subtracted_amount));

            if !settings.winner_subtracts_points {
                prop_assert_eq!(round.subtracted_amount, 0);
            } else if settings.winner_subtract_type == SubtractType::Fixed {
                prop_assert_eq!(round.subtracted_amount, settings.winner_subtract_value);
            } else {
                let others: i64 = round
                    .points
                    .iter()
                    .filter(|p| p.player_id != round.winner_id)
                    .map(|p| i64::from(p.points))
                    .sum();
                let amount = i64::from(round.subtracted_amount);
                prop_assert!(amount == 0 || amount >= i64::from(MIN_PERCENT_SUBTRACTION));
                prop_assert!(amount <= others);
            }
        }
    }

    /// Property: editing any round keeps totals equal to the replayed history
    #[test]
    fn prop_edit_keeps_totals_consistent(
        (n, plan, replacement) in game_plan(5).prop_flat_map(|(n, plan)| {
            (Just(n), Just(plan), round_entries(ids(n)))
        }),
        index in any::<prop::sample::Index>(),
        settings in any_settings(),
    ) {
        let state = play(n, settings, plan)?;
        let index = index.index(state.rounds.len());
        let edited = reduce(&state, Action::EditRound { index, entries: replacement.1 })
            .map_err(|e| TestCaseError::fail(format!("edit rejected: {e}")))?;

        assert_consistent(&edited)?;
        prop_assert_eq!(&edited.rounds[index].id, &state.rounds[index].id);
        prop_assert_eq!(edited.rounds.len(), state.rounds.len());
    }

    /// Property: recomputing from history changes nothing
    #[test]
    fn prop_recompute_is_idempotent(
        (n, plan) in game_plan(5),
        settings in any_settings(),
    ) {
        let state = play(n, settings, plan)?;
        let mut players = state.players.clone();
        recompute_from_history(&mut players, &state.rounds);
        prop_assert_eq!(&players, &state.players);
        recompute_from_history(&mut players, &state.rounds);
        prop_assert_eq!(&players, &state.players);
    }

    /// Property: a late joiner sees the same round ids and a total built
    /// from their carry-over
    #[test]
    fn prop_late_joiner_shares_round_history(
        (n, plan) in game_plan(4),
        settings in any_settings(),
        more in 0usize..=2usize,
    ) {
        let state = play(n, settings, plan)?;
        let state = reduce(
            &state,
            Action::AddPlayer {
                id: PlayerId::from("late"),
                name: "Late".into(),
            },
        )
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let late = state.player(&PlayerId::from("late")).expect("added").clone();
        let totals: Vec<i32> = state
            .players
            .iter()
            .filter(|p| p.id != late.id)
            .map(|p| p.points)
            .collect();
        prop_assert!(totals.contains(&late.starting_points) || late.starting_points == 0);

        // More rounds including the newcomer.
        let mut state = state;
        let everyone: Vec<PlayerId> = state.players.iter().map(|p| p.id.clone()).collect();
        for i in 0..more {
            let mut entries: Vec<PlayerPoints> = everyone
                .iter()
                .map(|id| PlayerPoints::direct(id.clone(), 5))
                .collect();
            entries[i % everyone.len()] = PlayerPoints::zero(everyone[i % everyone.len()].clone());
            let winner_id = everyone[i % everyone.len()].clone();
            state = reduce(
                &state,
                Action::AddRound {
                    winner_id,
                    entries,
                    round_id: RoundId::from(format!("extra{i}")),
                    timestamp: ts(),
                },
            )
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        }

        assert_consistent(&state)?;
        let round_ids: Vec<&RoundId> = state.rounds.iter().map(|r| &r.id).collect();
        for view in state.player_views() {
            let seen: Vec<&RoundId> = view.rounds.iter().map(|r| &r.id).collect();
            prop_assert_eq!(&seen, &round_ids);
            prop_assert_eq!(view.round_points().len(), state.rounds.len());
        }
    }
}
