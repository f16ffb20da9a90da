// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::JobId;

/// Command-line arguments for `jobdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "jobdag",
    version,
    about = "Store job DAGs of tabular transforms and run them.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Jobdag.toml` in the current directory is used when it
    /// exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JOBDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate and store a job body read from a JSON file; prints the new id.
    Create {
        #[arg(value_name = "BODY.json")]
        body: PathBuf,
    },
    /// Print a stored job as JSON.
    Read { job_id: JobId },
    /// Replace a stored job's body, keeping its id.
    Update {
        job_id: JobId,
        #[arg(value_name = "BODY.json")]
        body: PathBuf,
    },
    /// Remove a stored job.
    Delete { job_id: JobId },
    /// Print every stored job as JSON.
    List,
    /// Execute a stored job.
    Run {
        job_id: JobId,

        /// Print the execution order and task descriptors, but run nothing.
        #[arg(long)]
        dry_run: bool,
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
