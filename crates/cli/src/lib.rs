//! # carebook-cli - Command Line Front End
//!
//! Runs Carebook's read-side features against a snapshot directory of
//! records API payloads: the patient search box, the dashboard, patient and
//! custom field views, and draft validation.
//!
//! The binary is a thin wrapper: parse [`Cli`], call [`init_logging`],
//! validate the [`Config`], open a [`SnapshotStore`](carebook_store::SnapshotStore)
//! and hand the command to [`run`].

pub mod commands;
pub mod config;
pub mod output;

pub use commands::{Command, Output, run};
pub use config::{Cli, Config, OutputFormat};

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at startup. `RUST_LOG` takes precedence over
/// `level`. Logs go to stderr so command output stays clean.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "carebook_cli={level},carebook_store={level},carebook_search={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
