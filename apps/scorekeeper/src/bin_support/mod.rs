//! Command-line collaborator: argument parsing, entry syntax and command
//! execution against a [`Store`](crate::store::Store).

pub mod cli;
pub mod commands;
pub mod entries;
pub mod error;
pub mod render;

pub use cli::{Cli, Command};
pub use commands::run;
pub use error::CliError;
