//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Forza Recorder - record telemetry from several cars and export one CSV per car
#[derive(Parser, Debug)]
#[command(
    name = "forza-recorder",
    author,
    version,
    about = "Multi-car UDP telemetry recorder",
    long_about = "Listens for UDP telemetry on a set of ports (one car per port), starts \n\
                  recording once every car reports the race as on, stops when every car \n\
                  reports it as off, and exports each car's history."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FORZA_RECORDER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FORZA_RECORDER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a race and export every car's telemetry
    Run(RunArgs),

    /// Resolve and validate configuration without listening
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Optional configuration file (TOML or JSON)
    #[arg(short, long, env = "FORZA_RECORDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ports to listen on: comma list or inclusive range start-end [default: 5030-5040]
    #[arg(short, long, env = "FORZA_RECORDER_PORTS")]
    pub ports: Option<String>,

    /// Address every listener binds on
    #[arg(long, env = "FORZA_RECORDER_BIND")]
    pub bind: Option<String>,

    /// Capacity of the shared packet queue
    #[arg(long, env = "FORZA_RECORDER_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Directory CSV files are written to
    #[arg(short, long, env = "FORZA_RECORDER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "FORZA_RECORDER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without listening
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Optional configuration file to validate
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port specification to check instead of the configured one
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
