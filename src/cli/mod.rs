//! CLI argument parsing for trainlaunch.
//!
//! Uses clap derive macros for declarative argument definitions. The launch
//! itself is driven by the `orchestrate` module.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// trainlaunch: start a training run on this machine or across an MPI fleet.
///
/// With `--devices` (or no placement at all) one controller runs locally.
/// With more than one host, an MPI launcher starts one controller per host.
/// The launcher supervises that single child and exits with a code that
/// reflects how it ended.
#[derive(Parser, Debug)]
#[command(name = "trainlaunch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Experiment name; `<name>_worker` must exist in the working directory.
    pub experiment: String,

    /// Devices for a single-node run, in order (e.g. cuda0 cuda3).
    #[arg(long, num_args = 1.., value_name = "DEVICE", conflicts_with = "hosts")]
    pub devices: Vec<String>,

    /// Hosts to run on; more than one selects multi-node mode.
    #[arg(long, num_args = 1.., value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Extra arguments for the controller, split with shell rules.
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    pub controller_args: Option<String>,

    /// Extra arguments forwarded by the controller to every worker.
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    pub worker_args: Option<String>,

    /// Path to the config file (YAML).
    ///
    /// Default: `trainlaunch.yaml` in the working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TRAINLAUNCH_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved command without creating logs or spawning anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_devices_in_order() {
        let cli = Cli::try_parse_from(["trainlaunch", "lstm", "--devices", "cuda0", "cuda3"]).unwrap();
        assert_eq!(cli.experiment, "lstm");
        assert_eq!(cli.devices, vec!["cuda0", "cuda3"]);
        assert!(cli.hosts.is_empty());
    }

    #[test]
    fn parses_hosts_and_free_text_args() {
        let cli = Cli::try_parse_from([
            "trainlaunch",
            "lstm",
            "--hosts",
            "nodeA",
            "nodeB",
            "--controller-args",
            "--epochs 3",
            "--worker-args",
            "lr=0.1 momentum=0.9",
        ])
        .unwrap();

        assert_eq!(cli.hosts, vec!["nodeA", "nodeB"]);
        assert_eq!(cli.controller_args.as_deref(), Some("--epochs 3"));
        assert_eq!(cli.worker_args.as_deref(), Some("lr=0.1 momentum=0.9"));
    }

    #[test]
    fn devices_and_hosts_conflict() {
        let err = Cli::try_parse_from([
            "trainlaunch",
            "lstm",
            "--devices",
            "cuda0",
            "--hosts",
            "nodeA",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn experiment_is_required() {
        assert!(Cli::try_parse_from(["trainlaunch"]).is_err());
    }

    #[test]
    fn log_level_and_dry_run() {
        let cli = Cli::try_parse_from(["trainlaunch", "lstm", "--log-level", "debug", "--dry-run"])
            .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.dry_run);
    }
}
