//! Domain layer: UNO scoring types, round resolution and state transitions.

pub mod cards;
pub mod ids;
pub mod player;
pub mod reducer;
pub mod round;
pub mod round_flow;
pub mod scoring;
pub mod settings;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_consistency;
#[cfg(test)]
mod tests_reducer;

// Re-exports for ergonomics
pub use cards::{CardKind, CardSelection, UnoCard, UNO_CARDS};
pub use ids::{PlayerId, RoundId};
pub use player::{Player, PlayerView};
pub use reducer::{reduce, Action};
pub use round::{PlayerPoints, Round};
pub use round_flow::{RoundDraft, RoundPhase, RoundTarget};
pub use scoring::{
    apply_round, edit_round, recompute_from_history, resolve_new_round, subtraction_amount,
};
pub use settings::{GameSettings, InitialScore, SettingsPatch, SubtractType, TargetPoints, Theme};
pub use state::GameState;
