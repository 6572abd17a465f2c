//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod import;
mod logs;

pub use import::ImportArgs;
pub use logs::LogsCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Browse job logs served by the joblog server
    Logs {
        #[command(subcommand)]
        command: LogsCommands,
    },
    /// Validate job records from a JSON file and write them as Parquet
    Import(ImportArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Logs { command } => logs::handle_logs_command(command, config).await,
        Commands::Import(args) => import::handle_import(args).await,
    }
}
