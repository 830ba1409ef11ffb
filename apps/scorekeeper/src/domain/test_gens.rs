// Proptest generators for scoring types.
// Generated rounds always have exactly one winner entry so they can be committed.

use proptest::prelude::*;

use crate::domain::{
    CardKind, CardSelection, GameSettings, InitialScore, PlayerId, PlayerPoints, SubtractType,
    UNO_CARDS,
};

/// Any card in the catalogue
pub fn card_kind() -> impl Strategy<Value = CardKind> {
    (0..UNO_CARDS.len()).prop_map(|i| UNO_CARDS[i].kind)
}

/// A valid selection (quantity 1..=4)
pub fn card_selection() -> impl Strategy<Value = CardSelection> {
    (card_kind(), 1u8..=4u8)
        .prop_map(|(kind, qty)| CardSelection::new(kind, qty).expect("quantity in range"))
}

/// Cards and direct points that can never qualify as the winner entry
pub fn loser_parts() -> impl Strategy<Value = (Vec<CardSelection>, u32)> {
    prop_oneof![
        (1u32..=150u32).prop_map(|direct| (Vec::new(), direct)),
        (prop::collection::vec(card_selection(), 1..=3), 0u32..=40u32),
    ]
}

/// Entries for `ids` where the player at `winner` holds the only zero entry.
pub fn round_entries(ids: Vec<PlayerId>) -> impl Strategy<Value = (usize, Vec<PlayerPoints>)> {
    let n = ids.len();
    (0..n, prop::collection::vec(loser_parts(), n)).prop_map(move |(winner, parts)| {
        let entries = ids
            .iter()
            .zip(parts)
            .enumerate()
            .map(|(i, (id, (cards, direct)))| {
                if i == winner {
                    PlayerPoints::zero(id.clone())
                } else {
                    PlayerPoints::new(id.clone(), cards, direct)
                }
            })
            .collect();
        (winner, entries)
    })
}

pub fn subtract_type() -> impl Strategy<Value = SubtractType> {
    prop_oneof![Just(SubtractType::Fixed), Just(SubtractType::Percent)]
}

pub fn initial_score() -> impl Strategy<Value = InitialScore> {
    prop_oneof![
        Just(InitialScore::Zero),
        Just(InitialScore::Min),
        Just(InitialScore::Max),
    ]
}

/// Settings with every subtraction and carry-over combination
pub fn settings() -> impl Strategy<Value = GameSettings> {
    (any::<bool>(), subtract_type(), 0u32..=100u32, initial_score()).prop_map(
        |(enabled, kind, value, initial)| GameSettings {
            winner_subtracts_points: enabled,
            winner_subtract_type: kind,
            winner_subtract_value: value,
            new_player_initial_score: initial,
            ..GameSettings::default()
        },
    )
}
