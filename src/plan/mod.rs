//! Command construction for a launch.
//!
//! Turns a resolved [`LaunchSpec`] into a [`CommandPlan`]: the program to
//! run, its argument vector, and the environment variables to override.
//! Nothing here touches the process environment or spawns anything; the
//! environment comes in as an [`EnvSnapshot`] and entry points are checked
//! through the [`EntryPoints`] seam.

mod entry_points;

#[cfg(test)]
mod tests;

pub use entry_points::{DirEntryPoints, EntryPoints, entry_point_name};

use crate::config::LauncherConfig;
use crate::env::EnvSnapshot;
use crate::error::{LauncherError, Result};
use crate::mode::{Mode, Resolution};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flag preceding the single re-quoted worker-args token.
pub const WORKER_ARGS_FLAG: &str = "--worker-args";

/// Flag preceding the device list in single-node mode.
pub const DEVICES_FLAG: &str = "--devices";

/// Everything needed to build the command for one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub mode: Mode,
    pub experiment_name: String,
    pub devices: Vec<String>,
    pub hosts: Vec<String>,
    pub controller_args: Option<String>,
    pub worker_args: Option<String>,
    pub logs_dir: PathBuf,
}

impl LaunchSpec {
    pub fn new(
        experiment_name: impl Into<String>,
        resolution: Resolution,
        controller_args: Option<String>,
        worker_args: Option<String>,
        logs_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mode: resolution.mode,
            experiment_name: experiment_name.into(),
            devices: resolution.devices,
            hosts: resolution.hosts,
            controller_args,
            worker_args,
            logs_dir: logs_dir.into(),
        }
    }
}

/// Program, arguments, and environment overrides for the child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPlan {
    pub program: String,
    pub args: Vec<String>,
    pub env_overlay: BTreeMap<String, String>,
}

impl CommandPlan {
    /// Shell-quoted rendering of the command line, for logs and `--dry-run`.
    pub fn command_line(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Build the command plan for a launch.
///
/// Fails with a configuration error if the worker entry point is missing or
/// a free-text argument string cannot be split.
pub fn build(
    spec: &LaunchSpec,
    config: &LauncherConfig,
    env: &EnvSnapshot,
    entry_points: &dyn EntryPoints,
) -> Result<CommandPlan> {
    let worker = entry_point_name(&spec.experiment_name, "worker", &config.entry_point_suffix);
    if !entry_points.exists(&worker) {
        return Err(LauncherError::Configuration(format!(
            "worker entry point '{}' not found in the working directory",
            worker
        )));
    }

    let controller = select_controller(spec, config, entry_points);
    let tail = passthrough_args(spec)?;

    let plan = match spec.mode {
        Mode::Single => single_node_plan(spec, config, &controller, tail),
        Mode::Multi => multi_node_plan(spec, config, env, &controller, tail),
    };

    tracing::debug!(
        mode = %spec.mode,
        controller = %controller,
        command = %plan.command_line(),
        "built command plan"
    );

    Ok(plan)
}

/// The experiment's own controller if present, else the configured default.
fn select_controller(
    spec: &LaunchSpec,
    config: &LauncherConfig,
    entry_points: &dyn EntryPoints,
) -> String {
    let specialized = entry_point_name(
        &spec.experiment_name,
        "controller",
        &config.entry_point_suffix,
    );
    if entry_points.exists(&specialized) {
        specialized
    } else {
        config.default_controller.clone()
    }
}

/// Controller args as separate tokens, then worker args re-quoted as one token.
fn passthrough_args(spec: &LaunchSpec) -> Result<Vec<String>> {
    let mut tail = Vec::new();

    if let Some(raw) = &spec.controller_args {
        tail.extend(split_words("--controller-args", raw)?);
    }

    if let Some(raw) = &spec.worker_args {
        let words = split_words("--worker-args", raw)?;
        tail.push(WORKER_ARGS_FLAG.to_string());
        tail.push(shell_words::join(&words));
    }

    Ok(tail)
}

fn split_words(flag: &str, raw: &str) -> Result<Vec<String>> {
    shell_words::split(raw).map_err(|e| {
        LauncherError::Configuration(format!(
            "failed to parse {} '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            flag, raw, e
        ))
    })
}

/// `<controller> <experiment> <logs_dir> <mode flag>` shared by both modes.
fn controller_invocation(spec: &LaunchSpec, controller: &str, mode_flag: &str) -> Vec<String> {
    vec![
        controller.to_string(),
        spec.experiment_name.clone(),
        spec.logs_dir.to_string_lossy().to_string(),
        mode_flag.to_string(),
    ]
}

fn single_node_plan(
    spec: &LaunchSpec,
    config: &LauncherConfig,
    controller: &str,
    tail: Vec<String>,
) -> CommandPlan {
    let mut args = controller_invocation(spec, controller, "--single");

    if !spec.devices.is_empty() {
        args.push(DEVICES_FLAG.to_string());
        args.extend(spec.devices.iter().cloned());
    }
    args.extend(tail);

    CommandPlan {
        program: config.runtime.clone(),
        args,
        env_overlay: BTreeMap::new(),
    }
}

fn multi_node_plan(
    spec: &LaunchSpec,
    config: &LauncherConfig,
    env: &EnvSnapshot,
    controller: &str,
    tail: Vec<String>,
) -> CommandPlan {
    let output = spec.logs_dir.join(&config.mpi_output_name);

    let mut args = vec![
        // One controller per host; each controller places its own devices.
        "-np".to_string(),
        spec.hosts.len().to_string(),
        "--npernode".to_string(),
        "1".to_string(),
        "--host".to_string(),
        spec.hosts.join(","),
        "--output-filename".to_string(),
        output.to_string_lossy().to_string(),
        "--mca".to_string(),
        "mpi_warn_on_fork".to_string(),
        "0".to_string(),
    ];

    // The blanked device variable stays local to the wrapper.
    for key in env.keys() {
        if key != config.device_env_var && is_exportable_name(key) {
            args.push("-x".to_string());
            args.push(key.to_string());
        }
    }

    args.push(config.runtime.clone());
    args.extend(controller_invocation(spec, controller, "--multi"));
    args.extend(tail);

    let mut env_overlay = BTreeMap::new();
    env_overlay.insert(config.device_env_var.clone(), String::new());

    CommandPlan {
        program: config.mpi_launcher.clone(),
        args,
        env_overlay,
    }
}

/// Shell-style identifier; excludes exported functions like `BASH_FUNC_x%%`.
fn is_exportable_name(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
