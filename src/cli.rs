// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use crate::time::parse_instant;

/// Command-line arguments for `phaseflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "phaseflow",
    version,
    about = "Schedule construction project workflows, raise due-date alerts and track progress.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Phaseflow.toml` in the current working directory. A missing
    /// file means built-in defaults.
    #[arg(long, value_name = "PATH", default_value = "Phaseflow.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PHASEFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Instantiate the step template and schedule it over a date window.
    Template {
        #[arg(long, value_name = "DATE", value_parser = parse_instant)]
        start: DateTime<Utc>,

        #[arg(long, value_name = "DATE", value_parser = parse_instant)]
        end: DateTime<Utc>,
    },

    /// Print alerts and progress for every project in a snapshot.
    Check {
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Evaluate as of this instant instead of the current time.
        #[arg(long, value_name = "DATETIME", value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },

    /// Validate the task dependency graph of a snapshot.
    Tasks {
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,
    },

    /// Run the periodic alert sweep over a snapshot.
    Sweep {
        #[arg(long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Run a single sweep and exit.
        #[arg(long)]
        once: bool,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
