//! trainlaunch: launch and supervise a single-node or multi-node training run.
//!
//! This is the main entry point for the `trainlaunch` CLI. It parses
//! arguments, snapshots the environment, runs the launch pipeline, and maps
//! the result to an exit code.

mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod exit_codes;
pub mod hosts;
pub mod launch;
mod logging;
pub mod mode;
mod orchestrate;
pub mod outcome;
pub mod plan;
pub mod run_dir;
pub mod supervise;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::LauncherConfig;
use env::EnvSnapshot;
use error::LauncherError;
use orchestrate::{Report, RunContext};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let env = EnvSnapshot::capture();

    if let Err(err) = logging::init_logging(cli.log_level, &env) {
        eprintln!("Error: {:#}", err);
    }

    let code = match execute(&cli, env) {
        Ok(code) => code,
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };

    ExitCode::from(code as u8)
}

fn execute(cli: &Cli, env: EnvSnapshot) -> error::Result<i32> {
    let workdir = std::env::current_dir().map_err(|e| {
        LauncherError::Configuration(format!("failed to read working directory: {}", e))
    })?;
    let config = LauncherConfig::discover(cli.config.as_deref(), &workdir)?;

    let ctx = RunContext {
        config,
        env,
        workdir,
        local_hostname: hosts::local_hostname(),
    };

    match orchestrate::run(cli, &ctx)? {
        Report::Planned(plan) => {
            for (key, value) in &plan.env_overlay {
                println!("{}={}", key, shell_words::quote(value));
            }
            println!("{}", plan.command_line());
            Ok(exit_codes::SUCCESS)
        }
        Report::Completed(outcome) => {
            if outcome.is_success() {
                println!("{}", outcome.describe());
            } else {
                eprintln!("Error: {}", outcome.describe());
            }
            Ok(outcome::translate(&outcome))
        }
    }
}
