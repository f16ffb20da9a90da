// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod job;
pub mod logging;
pub mod service;
pub mod store;
pub mod table;
pub mod task;
pub mod types;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::{ConfigFile, default_config_path, load_and_validate, load_or_default};
use crate::dag::{JobGraph, PetgraphSort, TopologicalSort};
use crate::errors::JobError;
use crate::job::{JobBody, JobRecord};
use crate::service::JobService;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - record store + executor behind the job service
/// - dispatch of the requested subcommand
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    debug!(
        database = ?cfg.storage.database,
        data_dir = ?cfg.storage.data_dir,
        "configuration loaded"
    );

    let service = JobService::from_config(&cfg)?;

    match args.command {
        Command::Create { body } => {
            let job_id = service.create(read_body(&body)?).await?;
            println!("{job_id}");
        }
        Command::Read { job_id } => {
            let record = service.read(job_id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Update { job_id, body } => {
            let updated = service.update(job_id, read_body(&body)?).await?;
            println!("{}", if updated { "updated" } else { "rejected" });
        }
        Command::Delete { job_id } => {
            let deleted = service.delete(job_id).await?;
            println!("{}", if deleted { "deleted" } else { "not found" });
        }
        Command::List => {
            let records = service.list().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Run { job_id, dry_run } => {
            let record = service.read(job_id).await?;
            if dry_run {
                print_dry_run(&record)?;
                return Ok(());
            }
            let report = service.run(job_id).await?;
            for log in &report.logs {
                println!("{}", log.task);
                for line in log.lines() {
                    println!("  {line}");
                }
            }
        }
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let cfg = match &args.config {
        Some(path) => load_and_validate(path)?,
        None => load_or_default(default_config_path())?,
    };
    Ok(cfg)
}

/// Parse a job body from a JSON file. Malformed bodies are validation errors.
fn read_body(path: &Path) -> Result<JobBody> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading job body from {:?}", path))?;
    let body = serde_json::from_str(&contents)
        .map_err(|e| JobError::Validation(format!("malformed job body in {:?}: {e}", path)))?;
    Ok(body)
}

/// Simple dry-run output: print the execution order and each descriptor.
fn print_dry_run(record: &JobRecord) -> Result<()> {
    let order = PetgraphSort.order(record.task_list()).map_err(|cycle| {
        JobError::CyclicGraph(format!(
            "job {} has a cycle involving task '{}'",
            record.job_id, cycle.task
        ))
    })?;
    let graph = JobGraph::from_task_list(record.task_list());

    println!("jobdag dry-run: job {}", record.job_id);
    println!("  roots: {:?}", graph.roots());
    println!();

    println!("tasks ({}):", order.len());
    for name in &order {
        println!("  - {name}");
        if let Some(descriptor) = record.property().get(name) {
            println!("      kind: {}", descriptor.kind());
            println!("      {}", serde_json::to_string(descriptor)?);
        }
        let downstream = graph.downstream_of(name);
        if !downstream.is_empty() {
            println!("      feeds: {:?}", downstream);
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
