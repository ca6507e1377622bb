//! # Forza Recorder CLI
//!
//! `forza-recorder run` listens on a port range, waits for every car to
//! report the race on, records until all of them are off again, and
//! exports one CSV per car. `forza-recorder validate` checks a config
//! without binding anything.

mod cli;
mod commands;
mod error;
mod logging;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_pipeline, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(&cli)?;

    let command = match &cli.command {
        Commands::Run(_) => "run",
        Commands::Validate(_) => "validate",
    };
    info!(version = env!("CARGO_PKG_VERSION"), command, "forza-recorder");

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, command, "command failed");
    }
    result
}
