// src/logging.rs

//! Logging setup for `taskdag` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (one level for everything)
//! 2. `TASKDAG_LOG`, as `EnvFilter` directives (`debug`,
//!    `taskdag::dag=trace,info`, ...)
//! 3. `info`
//!
//! Logs go to STDERR; STDOUT carries the plan and execution report.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TASKDAG_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_directives = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env_directives.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Resolve the filter from the CLI level and the raw `TASKDAG_LOG` value.
///
/// A blank variable counts as unset; malformed directives are an error
/// rather than being silently dropped.
pub fn build_filter(cli_level: Option<LogLevel>, env_directives: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(level.as_directive()));
    }

    match env_directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow!("invalid {LOG_ENV} directives {directives:?}: {e}")),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}
