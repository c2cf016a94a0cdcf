//! CLI module graph.

pub mod check;
pub mod command;
pub mod output;
pub mod run;
pub mod subscribers;

use crate::error::Result;
use command::{CheckCommand, Cli, Commands};

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Config(args)) => check::config::execute(&args),
        Commands::Check(CheckCommand::Feed(args)) => check::feed::execute(&args).await,
        Commands::Subscribers(args) => subscribers::execute(&args),
    }
}
