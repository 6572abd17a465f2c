//! Logs command handlers
//!
//! Lists job records page by page through the server API.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use joblog_client::LogClient;
use joblog_core::domain::job::{JobRecord, JobStatus};
use joblog_core::dto::log::{LogListQuery, LogPage};

use crate::config::Config;

/// Logs subcommands
#[derive(Subcommand)]
pub enum LogsCommands {
    /// List one page of job records
    List {
        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<u32>,

        /// Records per page
        #[arg(short, long)]
        size: Option<u32>,

        /// Case-insensitive substring of the job id
        #[arg(long)]
        search: Option<String>,

        /// success, error or all
        #[arg(long)]
        status: Option<String>,

        /// Only jobs starting at or after this instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only jobs ending at or before this instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Show each job's operators
        #[arg(long)]
        operators: bool,
    },
}

/// Handle logs commands
pub async fn handle_logs_command(command: LogsCommands, config: &Config) -> Result<()> {
    let client = LogClient::new(&config.server_url);

    match command {
        LogsCommands::List {
            page,
            size,
            search,
            status,
            from,
            to,
            operators,
        } => {
            let query = LogListQuery {
                page,
                size,
                search,
                status,
                start_date: from,
                end_date: to,
            };
            list_logs(&client, &query, operators).await
        }
    }
}

async fn list_logs(client: &LogClient, query: &LogListQuery, show_operators: bool) -> Result<()> {
    let page = client
        .list_logs(query)
        .await
        .context("Failed to list logs")?;

    if page.logs.is_empty() {
        println!("{}", "No job logs found.".yellow());
        if page.total_files > 0 {
            println!(
                "{}",
                format!(
                    "  {} matching job(s), but page {} is past the end.",
                    page.total_files, page.page
                )
                .dimmed()
            );
        }
        return Ok(());
    }

    println!("{}", page_header(&page).bold());
    println!();
    for job in &page.logs {
        print_job_summary(job, show_operators);
    }

    Ok(())
}

fn page_header(page: &LogPage) -> String {
    format!(
        "Page {}/{} ({} matching job(s), {} per page):",
        page.page,
        page.total_pages(),
        page.total_files,
        page.page_size
    )
}

/// Print a job summary
fn print_job_summary(job: &JobRecord, show_operators: bool) {
    println!("  {} Job {}", "▸".cyan(), job.id.bold());
    println!("    Status:    {}", colorize_status(&job.status));
    println!(
        "    Started:   {}",
        job.start_time
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("    Duration:  {}s", job.duration_seconds);
    println!("    Executors: {}", job.num_executors);

    for error in &job.errors {
        println!("    {} {}", "✗".red(), error.red());
    }

    if show_operators {
        for op in &job.operators {
            let deps = if op.dependencies.is_empty() {
                String::new()
            } else {
                format!(" ← {}", op.dependencies.join(", "))
            };
            println!(
                "      {} {} ({}s){}",
                op.operator_id.cyan(),
                op.operator_type,
                op.duration_seconds,
                deps.dimmed()
            );
            for error in &op.errors {
                println!("        {} {}", "✗".red(), error.red());
            }
        }
    }

    println!();
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    match status {
        JobStatus::Success => status.as_str().green(),
        JobStatus::Error => status.as_str().red(),
    }
}
