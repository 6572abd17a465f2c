//! Joblog CLI
//!
//! Command-line interface for browsing job logs and importing job records.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "joblog")]
#[command(about = "Job execution log CLI", long_about = None)]
struct Cli {
    /// Joblog server URL
    #[arg(long, env = "JOBLOG_SERVER_URL", default_value = "http://localhost:3000")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
