//! Rounds and per-player point entries.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::cards::{cards_total, CardSelection};
use super::ids::{PlayerId, RoundId};

/// One player's contribution to a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPoints {
    pub player_id: PlayerId,
    /// Card value plus direct points; for the winner, minus the subtraction.
    pub points: i32,
    #[serde(default)]
    pub cards: Vec<CardSelection>,
    #[serde(default)]
    pub direct_points: u32,
}

impl PlayerPoints {
    /// Entry whose `points` are derived from the cards and direct points.
    pub fn new(player_id: PlayerId, cards: Vec<CardSelection>, direct_points: u32) -> Self {
        let mut entry = Self {
            player_id,
            points: 0,
            cards,
            direct_points,
        };
        entry.points = entry.base_points();
        entry
    }

    /// Direct points only, no cards.
    pub fn direct(player_id: PlayerId, direct_points: u32) -> Self {
        Self::new(player_id, Vec::new(), direct_points)
    }

    /// The entry a player gets when they contributed nothing.
    pub fn zero(player_id: PlayerId) -> Self {
        Self::new(player_id, Vec::new(), 0)
    }

    /// Winner predicate: no cards left and no direct points.
    pub fn is_winner_candidate(&self) -> bool {
        self.cards.is_empty() && self.direct_points == 0
    }

    /// Points before any winner subtraction.
    pub fn base_points(&self) -> i32 {
        let total = cards_total(&self.cards).saturating_add(self.direct_points);
        i32::try_from(total).unwrap_or(i32::MAX)
    }

    /// Fold another entry for the same player into this one.
    pub fn absorb(&mut self, other: PlayerPoints) {
        debug_assert_eq!(self.player_id, other.player_id);
        self.cards.extend(other.cards);
        self.direct_points = self.direct_points.saturating_add(other.direct_points);
        self.points = self.points.saturating_add(other.points);
    }
}

/// A committed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    pub winner_id: PlayerId,
    pub points: Vec<PlayerPoints>,
    #[serde(default)]
    pub subtracted_amount: u32,
    #[serde(with = "timestamp", default = "timestamp::unknown")]
    pub timestamp: OffsetDateTime,
}

impl Round {
    pub fn entry_for(&self, player_id: &PlayerId) -> Option<&PlayerPoints> {
        self.points.iter().find(|p| &p.player_id == player_id)
    }

    /// What this round adds to the player's total (0 when absent).
    pub fn contribution(&self, player_id: &PlayerId) -> i32 {
        self.entry_for(player_id).map_or(0, |p| p.points)
    }

    pub fn winner_candidates(&self) -> impl Iterator<Item = &PlayerPoints> {
        self.points.iter().filter(|p| p.is_winner_candidate())
    }
}

/// RFC 3339 on write; also reads the millisecond epoch numbers older blobs
/// stored.
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    pub fn unknown() -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    pub fn serialize<S>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time::serde::rfc3339::serialize(ts, serializer)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Millis(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => OffsetDateTime::parse(&s, &Rfc3339).map_err(serde::de::Error::custom),
            Repr::Millis(ms) => {
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}
