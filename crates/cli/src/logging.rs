//! Log filter and subscriber setup.
//!
//! `-v` and `-q` only move the recorder's own crates. Dependencies (tokio,
//! metrics exporter) stay at `warn` unless `-vvv` or `RUST_LOG` asks for
//! more.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::cli::{Cli, LogFormat};

/// Tracing targets owned by the recorder
const RECORDER_TARGETS: &[&str] = &[
    "forza_recorder",
    "config_loader",
    "ingestion",
    "sync_engine",
    "exporter",
    "observability",
];

/// Filter directives for the given verbosity flags
pub fn filter_directives(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => return "warn".to_string(),
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, 2) => "trace",
        (false, _) => return "trace".to_string(),
    };

    let mut directives = String::from("warn");
    for target in RECORDER_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Install the global subscriber. `RUST_LOG` wins over `-v`, never over `-q`.
pub fn init(cli: &Cli) -> Result<()> {
    let directives = filter_directives(cli.verbose, cli.quiet);
    let filter = if cli.quiet {
        EnvFilter::try_new(&directives)?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&directives))?
    };

    let fmt_layer = match cli.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(false)
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_thread_ids(false).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
