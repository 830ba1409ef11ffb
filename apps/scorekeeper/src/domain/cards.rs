//! UNO card catalog and per-player card selections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::domain::{DomainError, ValidationKind};

/// Largest number of copies of one card a selection may hold.
pub const MAX_QUANTITY: u8 = 4;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CardKind {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

/// Static card definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnoCard {
    pub kind: CardKind,
    pub id: &'static str,
    pub name: &'static str,
    pub value: u32,
}

/// The fixed catalog, in display order.
#[rustfmt::skip]
pub const UNO_CARDS: [UnoCard; 15] = [
    UnoCard { kind: CardKind::Zero, id: "0", name: "Zero", value: 0 },
    UnoCard { kind: CardKind::One, id: "1", name: "One", value: 1 },
    UnoCard { kind: CardKind::Two, id: "2", name: "Two", value: 2 },
    UnoCard { kind: CardKind::Three, id: "3", name: "Three", value: 3 },
    UnoCard { kind: CardKind::Four, id: "4", name: "Four", value: 4 },
    UnoCard { kind: CardKind::Five, id: "5", name: "Five", value: 5 },
    UnoCard { kind: CardKind::Six, id: "6", name: "Six", value: 6 },
    UnoCard { kind: CardKind::Seven, id: "7", name: "Seven", value: 7 },
    UnoCard { kind: CardKind::Eight, id: "8", name: "Eight", value: 8 },
    UnoCard { kind: CardKind::Nine, id: "9", name: "Nine", value: 9 },
    UnoCard { kind: CardKind::Skip, id: "skip", name: "Skip", value: 20 },
    UnoCard { kind: CardKind::Reverse, id: "reverse", name: "Reverse", value: 20 },
    UnoCard { kind: CardKind::DrawTwo, id: "draw2", name: "Draw Two", value: 20 },
    UnoCard { kind: CardKind::Wild, id: "wild", name: "Wild", value: 50 },
    UnoCard { kind: CardKind::WildDrawFour, id: "wild4", name: "Wild Draw Four", value: 50 },
];

impl CardKind {
    pub fn card(self) -> &'static UnoCard {
        // UNO_CARDS is declared in variant order.
        &UNO_CARDS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.card().id
    }

    pub fn value(self) -> u32 {
        self.card().value
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.card().name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card id: {0}")]
pub struct ParseCardError(pub String);

impl FromStr for CardKind {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        UNO_CARDS
            .iter()
            .find(|c| c.id == needle)
            .map(|c| c.kind)
            .ok_or_else(|| ParseCardError(s.to_owned()))
    }
}

impl Serialize for CardKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for CardKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A number of copies of one card left in a player's hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardSelectionRepr")]
pub struct CardSelection {
    #[serde(rename = "cardId")]
    card: CardKind,
    quantity: u8,
}

impl CardSelection {
    pub fn new(card: CardKind, quantity: u8) -> Result<Self, DomainError> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(DomainError::validation(
                ValidationKind::InvalidQuantity,
                format!("quantity for {card} must be within 1..={MAX_QUANTITY}, got {quantity}"),
            ));
        }
        Ok(Self { card, quantity })
    }

    pub fn card(&self) -> CardKind {
        self.card
    }

    pub fn quantity(&self) -> u8 {
        self.quantity
    }

    pub fn points(&self) -> u32 {
        self.card.value() * u32::from(self.quantity)
    }
}

/// Total value of a set of selections.
pub fn cards_total(cards: &[CardSelection]) -> u32 {
    cards.iter().map(CardSelection::points).sum()
}

// Accepts both `{cardId, quantity}` and the older `{card: {id, ..}, quantity}`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardSelectionRepr {
    #[serde(default)]
    card_id: Option<CardKind>,
    #[serde(default)]
    card: Option<EmbeddedCard>,
    quantity: u8,
}

#[derive(Deserialize)]
struct EmbeddedCard {
    id: CardKind,
}

impl TryFrom<CardSelectionRepr> for CardSelection {
    type Error = String;

    fn try_from(repr: CardSelectionRepr) -> Result<Self, Self::Error> {
        let card = repr
            .card_id
            .or(repr.card.map(|c| c.id))
            .ok_or_else(|| "card selection without a card id".to_string())?;
        CardSelection::new(card, repr.quantity).map_err(|e| e.to_string())
    }
}
