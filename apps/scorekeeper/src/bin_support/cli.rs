use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{InitialScore, SubtractType, Theme};

#[derive(Debug, Parser)]
#[command(name = "scorekeeper")]
#[command(about = "Keep score for UNO games across rounds")]
pub struct Cli {
    /// State file (overrides SCOREKEEPER_STATE_FILE)
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show standings, settings and round history
    Show,
    /// Add a player to the roster
    AddPlayer { name: String },
    /// Remove a player (by id or name)
    RemovePlayer { player: String },
    /// Rename a player (by id or name)
    RenamePlayer {
        player: String,
        name: String,
    },
    /// Change game settings
    Settings(SettingsArgs),
    /// Record a round. Players left out score nothing and are the winner candidate.
    ///
    /// Entries look like `ana=wild,7x2,15`: cards with an optional `xQTY`,
    /// and bare numbers for direct points.
    Round {
        /// Expected winner; the round is rejected if the entries disagree
        #[arg(long)]
        winner: Option<String>,
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
    },
    /// Replace entries in a recorded round (1-based round number)
    EditRound {
        round: usize,
        #[arg(required = true, num_args = 1..)]
        entries: Vec<String>,
    },
    /// Remove the most recent round
    Undo,
    /// Start over with the same players and settings
    NewGame,
    /// Forget everything
    Reset,
    /// List the card catalogue
    Cards,
}

#[derive(Debug, Default, clap::Args)]
pub struct SettingsArgs {
    /// Score that ends the game (300, 400, 500, 600 or 700)
    #[arg(long)]
    pub target: Option<u32>,
    #[arg(long)]
    pub theme: Option<ThemeArg>,
    /// Whether the round winner gets points subtracted
    #[arg(long)]
    pub winner_subtracts: Option<bool>,
    #[arg(long)]
    pub subtract_type: Option<SubtractTypeArg>,
    #[arg(long)]
    pub subtract_value: Option<u32>,
    /// Starting score for players who join mid-game
    #[arg(long)]
    pub initial_score: Option<InitialScoreArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SubtractTypeArg {
    Fixed,
    Percent,
}

impl From<SubtractTypeArg> for SubtractType {
    fn from(arg: SubtractTypeArg) -> Self {
        match arg {
            SubtractTypeArg::Fixed => SubtractType::Fixed,
            SubtractTypeArg::Percent => SubtractType::Percent,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InitialScoreArg {
    Zero,
    Min,
    Max,
}

impl From<InitialScoreArg> for InitialScore {
    fn from(arg: InitialScoreArg) -> Self {
        match arg {
            InitialScoreArg::Zero => InitialScore::Zero,
            InitialScoreArg::Min => InitialScore::Min,
            InitialScoreArg::Max => InitialScore::Max,
        }
    }
}
