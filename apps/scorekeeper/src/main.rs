use std::process::ExitCode;

use clap::Parser;
use scorekeeper::bin_support::{run, Cli, CliError};
use scorekeeper::{AppConfig, FileStorage, Store};
use tracing::debug;

mod telemetry;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?.with_overrides(cli.state_file, cli.log_json);
    telemetry::init_tracing(config.log_json);
    debug!(state_file = %config.state_file.display(), "Configuration loaded");

    let mut store = Store::open(FileStorage::new(&config.state_file));
    let output = run(&mut store, cli.command)?;
    println!("{output}");

    if let Some(e) = store.last_save_error() {
        eprintln!(
            "warning [{}]: changes were not saved to {}: {e}",
            e.code(),
            config.state_file.display()
        );
    }
    Ok(())
}
