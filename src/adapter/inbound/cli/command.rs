//! Command-line interface definitions.
//!
//! Defines the CLI structure for tankwatch using `clap`: running the bot,
//! diagnostic checks and listing persisted subscribers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ISS urine tank level notifier for Telegram
#[derive(Parser, Debug)]
#[command(name = "tankwatch")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the tankwatch CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot until Ctrl+C
    Run(ConfigPathArg),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// List persisted subscriber chat ids
    Subscribers(ConfigPathArg),
}

/// Subcommands for `tankwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Load and validate the configuration.
    Config(ConfigPathArg),
    /// Connect to the telemetry feed and wait for the first level.
    Feed(ConfigPathArg),
}

/// Optional configuration file path.
#[derive(Parser, Debug, Default)]
pub struct ConfigPathArg {
    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
