// src/logging.rs

//! Logging setup for `jobdag` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` applies one level to the whole crate.
//! 2. Otherwise `JOBDAG_LOG` is read as an `EnvFilter` directive list, so
//!    `JOBDAG_LOG=info,jobdag::dag=debug` shows merge steps of a run only.
//! 3. Otherwise `jobdag=info`.
//!
//! Logs go to STDERR so stdout carries only command output (ids, JSON).

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

const ENV_VAR: &str = "JOBDAG_LOG";
const DEFAULT_DIRECTIVE: &str = "jobdag=info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level)?)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(format!("jobdag={}", directive(level))));
    }

    match std::env::var(ENV_VAR) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::try_new(spec.trim())
            .map_err(|e| anyhow::anyhow!("invalid {ENV_VAR} value {spec:?}: {e}")),
        _ => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
