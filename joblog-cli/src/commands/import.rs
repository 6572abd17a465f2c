//! Import command handler
//!
//! Turns a JSON array of job records into Parquet record files. Every record
//! is validated first; nothing is written unless all of them pass.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use joblog_core::domain::job::{InvalidJobRecord, JobRecord};
use joblog_store::write_records;

/// Arguments of `joblog import`
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding an array of job records
    pub input: PathBuf,

    /// Output directory, or output file with --single-file
    #[arg(short, long)]
    pub out: PathBuf,

    /// Write every record into one file instead of one file per job
    #[arg(long)]
    pub single_file: bool,
}

/// Handle the import command
pub async fn handle_import(args: ImportArgs) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let records: Vec<JobRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of job records", args.input.display()))?;

    let records = prepare(records).map_err(|invalid| {
        for record in &invalid {
            println!("{} {}", "✗".red(), record);
        }
        anyhow::anyhow!("{} invalid job record(s), nothing written", invalid.len())
    })?;

    let written = if args.single_file {
        write_single_file(&args.out, &records).await?
    } else {
        write_per_job(&args.out, &records).await?
    };

    println!(
        "{} Imported {} job record(s) into {} file(s) under {}",
        "✓".green(),
        records.len(),
        written,
        args.out.display()
    );

    Ok(())
}

/// Validate every record and sort them by id
///
/// Duplicate ids and ids that cannot be used as file names are rejected
/// alongside the record's own validation issues.
fn prepare(mut records: Vec<JobRecord>) -> std::result::Result<Vec<JobRecord>, Vec<String>> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for record in &records {
        if let Err(InvalidJobRecord { id, issues }) = record.validate() {
            for issue in issues {
                problems.push(format!("{}: {}", id, issue));
            }
        }

        if !is_file_name_safe(&record.id) {
            problems.push(format!("{}: id cannot be used as a file name", record.id));
        }

        if !seen.insert(record.id.as_str()) {
            problems.push(format!("{}: duplicate job id", record.id));
        }
    }

    if !problems.is_empty() {
        return Err(problems);
    }

    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}

fn is_file_name_safe(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
}

async fn write_single_file(out: &Path, records: &[JobRecord]) -> Result<usize> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    write_records(out, records)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    Ok(1)
}

async fn write_per_job(out: &Path, records: &[JobRecord]) -> Result<usize> {
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create {}", out.display()))?;

    for record in records {
        let path = out.join(format!("{}.parquet", record.id));
        write_records(&path, std::slice::from_ref(record))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(records.len())
}
