//! Plain-text views of the game for the terminal.

use crate::domain::{GameSettings, GameState, PlayerId, Round, SubtractType, UNO_CARDS};

fn display_name(state: &GameState, id: &PlayerId) -> String {
    state
        .player(id)
        .map_or_else(|| format!("(removed {id})"), |p| p.name.clone())
}

pub fn settings_line(settings: &GameSettings) -> String {
    let subtraction = if !settings.winner_subtracts_points {
        "off".to_owned()
    } else {
        match settings.winner_subtract_type {
            SubtractType::Fixed => format!("{} points", settings.winner_subtract_value),
            SubtractType::Percent => format!("{}% of the others", settings.winner_subtract_value),
        }
    };
    format!(
        "target {} | winner subtraction {} | late joiners start at {:?} | theme {:?}",
        settings.target_points.value(),
        subtraction,
        settings.new_player_initial_score,
        settings.theme,
    )
    .to_lowercase()
}

pub fn round_line(state: &GameState, number: usize, round: &Round) -> String {
    let entries: Vec<String> = round
        .points
        .iter()
        .map(|p| format!("{} {}", display_name(state, &p.player_id), p.points))
        .collect();
    let subtracted = if round.subtracted_amount > 0 {
        format!(" (-{})", round.subtracted_amount)
    } else {
        String::new()
    };
    format!(
        "{number:>3}. winner {}{subtracted}: {}",
        display_name(state, &round.winner_id),
        entries.join(", ")
    )
}

/// Standings, the game winner if any, and the round history.
pub fn render_state(state: &GameState) -> String {
    let mut lines = vec![format!("Settings: {}", settings_line(&state.settings))];

    if state.players.is_empty() {
        lines.push("No players yet. Add some with `scorekeeper add-player NAME`.".to_owned());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(format!("{:>3}  {:<20} {:>7} {:>5}  {}", "#", "Player", "Points", "Won", "Id"));
    for (rank, player) in state.standings().into_iter().enumerate() {
        let won = state
            .player_view(&player.id)
            .map_or(0, |view| view.rounds_won());
        lines.push(format!(
            "{:>3}  {:<20} {:>7} {:>5}  {}",
            rank + 1,
            player.name,
            player.points,
            won,
            player.id
        ));
    }

    if let Some(winner) = state.winner() {
        lines.push(String::new());
        lines.push(format!(
            "{} wins with {} points!",
            winner.name, winner.points
        ));
    }

    if !state.rounds.is_empty() {
        lines.push(String::new());
        lines.push("Rounds:".to_owned());
        for (i, round) in state.rounds.iter().enumerate() {
            lines.push(round_line(state, i + 1, round));
        }
    }

    if !state.draft.is_idle() {
        lines.push(String::new());
        lines.push(format!(
            "A round is in progress ({:?}) with {} pending entries.",
            state.draft.phase,
            state.draft.pending_points.len()
        ));
    }
    lines.join("\n")
}

pub fn render_cards() -> String {
    UNO_CARDS
        .iter()
        .map(|card| format!("{:<8} {:<16} {:>3}", card.id, card.name, card.value))
        .collect::<Vec<_>>()
        .join("\n")
}
