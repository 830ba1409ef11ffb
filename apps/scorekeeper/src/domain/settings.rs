//! Game settings and partial updates.

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Score at which a player has reached the end of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TargetPoints {
    P300,
    P400,
    P500,
    P600,
    P700,
}

impl TargetPoints {
    pub const ALL: [TargetPoints; 5] = [
        TargetPoints::P300,
        TargetPoints::P400,
        TargetPoints::P500,
        TargetPoints::P600,
        TargetPoints::P700,
    ];

    pub const fn value(self) -> u32 {
        match self {
            TargetPoints::P300 => 300,
            TargetPoints::P400 => 400,
            TargetPoints::P500 => 500,
            TargetPoints::P600 => 600,
            TargetPoints::P700 => 700,
        }
    }
}

impl TryFrom<u32> for TargetPoints {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        TargetPoints::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidTargetPoints,
                    format!("target points must be one of 300, 400, 500, 600, 700; got {value}"),
                )
            })
    }
}

impl From<TargetPoints> for u32 {
    fn from(t: TargetPoints) -> Self {
        t.value()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtractType {
    #[default]
    Fixed,
    Percent,
}

/// Starting score given to a player who joins once rounds exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialScore {
    #[default]
    Zero,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub target_points: TargetPoints,
    pub theme: Theme,
    pub winner_subtracts_points: bool,
    pub winner_subtract_type: SubtractType,
    pub winner_subtract_value: u32,
    pub new_player_initial_score: InitialScore,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            target_points: TargetPoints::P500,
            theme: Theme::System,
            winner_subtracts_points: false,
            winner_subtract_type: SubtractType::Fixed,
            winner_subtract_value: 0,
            new_player_initial_score: InitialScore::Zero,
        }
    }
}

/// Partial settings update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub target_points: Option<TargetPoints>,
    pub theme: Option<Theme>,
    pub winner_subtracts_points: Option<bool>,
    pub winner_subtract_type: Option<SubtractType>,
    pub winner_subtract_value: Option<u32>,
    pub new_player_initial_score: Option<InitialScore>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

impl GameSettings {
    /// Shallow merge. Existing rounds are never rescored.
    pub fn merged(&self, patch: &SettingsPatch) -> GameSettings {
        GameSettings {
            target_points: patch.target_points.unwrap_or(self.target_points),
            theme: patch.theme.unwrap_or(self.theme),
            winner_subtracts_points: patch
                .winner_subtracts_points
                .unwrap_or(self.winner_subtracts_points),
            winner_subtract_type: patch.winner_subtract_type.unwrap_or(self.winner_subtract_type),
            winner_subtract_value: patch
                .winner_subtract_value
                .unwrap_or(self.winner_subtract_value),
            new_player_initial_score: patch
                .new_player_initial_score
                .unwrap_or(self.new_player_initial_score),
        }
    }
}
