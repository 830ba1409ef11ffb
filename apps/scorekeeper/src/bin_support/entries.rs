//! `PLAYER=SPEC` point entries and player lookup.
//!
//! SPEC is a comma list where each item is either a card id with an
//! optional `xQTY` suffix (`wild`, `7x2`, `draw2x3`) or a bare number of
//! direct points. Several numbers are summed, and a bare digit is always
//! points, so a single number card is written `7x1`. An empty SPEC is the
//! winner's entry: no cards and no points.

use crate::domain::{CardKind, CardSelection, GameState, PlayerId};
use crate::errors::DomainError;

use super::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    /// Player id or name as typed.
    pub player: String,
    pub cards: Vec<CardSelection>,
    pub direct_points: u32,
}

pub fn parse_entry(raw: &str) -> Result<EntrySpec, CliError> {
    let (player, spec) = raw
        .rsplit_once('=')
        .ok_or_else(|| CliError::bad_input(format!("entry '{raw}' is not PLAYER=SPEC")))?;
    let player = player.trim();
    if player.is_empty() {
        return Err(CliError::bad_input(format!("entry '{raw}' has no player")));
    }

    let mut cards = Vec::new();
    let mut direct_points: u32 = 0;
    for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if let Ok(points) = item.parse::<u32>() {
            direct_points = direct_points
                .checked_add(points)
                .ok_or_else(|| CliError::bad_input(format!("direct points overflow in '{raw}'")))?;
            continue;
        }
        cards.push(parse_card(item)?);
    }

    Ok(EntrySpec {
        player: player.to_owned(),
        cards,
        direct_points,
    })
}

fn parse_card(item: &str) -> Result<CardSelection, CliError> {
    let (card, quantity) = match item.rsplit_once(|c: char| c.eq_ignore_ascii_case(&'x')) {
        Some((card, qty)) if !card.is_empty() && qty.chars().all(|c| c.is_ascii_digit()) => {
            let qty = qty
                .parse::<u8>()
                .map_err(|_| CliError::bad_input(format!("bad quantity in '{item}'")))?;
            (card, qty)
        }
        _ => (item, 1),
    };
    let kind: CardKind = card
        .parse()
        .map_err(|e| CliError::bad_input(format!("{e}")))?;
    Ok(CardSelection::new(kind, quantity)?)
}

/// Resolve a player by exact id, then by exact (trimmed) name.
pub fn resolve_player(state: &GameState, token: &str) -> Result<PlayerId, CliError> {
    let token = token.trim();
    if let Some(player) = state.players.iter().find(|p| p.id.as_str() == token) {
        return Ok(player.id.clone());
    }
    let mut named = state.players.iter().filter(|p| p.name == token);
    match (named.next(), named.next()) {
        (Some(player), None) => Ok(player.id.clone()),
        (Some(_), Some(_)) => Err(CliError::bad_input(format!(
            "several players are named '{token}'; use the id"
        ))),
        (None, _) => Err(DomainError::player_not_found(token).into()),
    }
}
