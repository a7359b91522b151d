//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `TRAINLAUNCH_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`

use crate::cli::LogLevel;
use crate::env::EnvSnapshot;
use anyhow::{Result, anyhow};
use tracing::Level;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV_VAR: &str = "TRAINLAUNCH_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>, env: &EnvSnapshot) -> Result<()> {
    let level = effective_level(cli_level, env);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

fn effective_level(cli_level: Option<LogLevel>, env: &EnvSnapshot) -> Level {
    match cli_level {
        Some(lvl) => lvl.into(),
        None => env
            .get(LOG_ENV_VAR)
            .and_then(parse_level_str)
            .unwrap_or(Level::INFO),
    }
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
