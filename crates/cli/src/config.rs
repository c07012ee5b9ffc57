//! Command line configuration.
//!
//! Global options apply to every command and fall back to environment
//! variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CAREBOOK_DATA_DIR` | . | Snapshot directory |
//! | `CAREBOOK_LOG_LEVEL` | info | Log level |
//! | `CAREBOOK_RECENT` | 5 | Patients shown on the dashboard |
//! | `CAREBOOK_FORMAT` | text | Output format (text, json) |
//!
//! # Example
//!
//! ```rust
//! use carebook_cli::{Config, OutputFormat};
//!
//! let config = Config {
//!     recent: 10,
//!     format: OutputFormat::Json,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::path::PathBuf;

use carebook_search::DEFAULT_RECENT;
use clap::{Args, Parser, ValueEnum};

use crate::commands::Command;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Directory holding patients.json and custom-fields.json.
    #[arg(long, global = true, env = "CAREBOOK_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "CAREBOOK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Number of recent patients shown on the dashboard.
    #[arg(long, global = true, env = "CAREBOOK_RECENT", default_value = "5")]
    pub recent: usize,

    /// Output format.
    #[arg(
        long,
        global = true,
        env = "CAREBOOK_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            recent: DEFAULT_RECENT,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            ));
        }

        if self.recent == 0 {
            errors.push("Recent patient count cannot be 0".to_string());
        }

        if !self.data_dir.is_dir() {
            errors.push(format!(
                "Data directory does not exist: {}",
                self.data_dir.display()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing, reading from `data_dir`.
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: "debug".to_string(),
            recent: DEFAULT_RECENT,
            format: OutputFormat::Text,
        }
    }
}

/// The `carebook` command line.
#[derive(Debug, Parser)]
#[command(name = "carebook")]
#[command(about = "Search and inspect patient records from API snapshots")]
#[command(version)]
pub struct Cli {
    /// Global options.
    #[command(flatten)]
    pub config: Config,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}
