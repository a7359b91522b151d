//! The launch pipeline: resolve, build, launch, supervise.

use crate::cli::Cli;
use crate::config::LauncherConfig;
use crate::env::EnvSnapshot;
use crate::error::{LauncherError, Result};
use crate::hosts::ConfiguredHosts;
use crate::launch::launch;
use crate::mode;
use crate::outcome::Outcome;
use crate::plan::{self, CommandPlan, DirEntryPoints, LaunchSpec};
use crate::run_dir::{LaunchManifest, create_run_dir, run_dir_path};
use crate::supervise::{SignalListener, Supervisor};
use chrono::Utc;
use std::path::PathBuf;

/// Inputs of one invocation that do not come from the command line.
pub struct RunContext {
    pub config: LauncherConfig,
    pub env: EnvSnapshot,
    /// Directory holding the experiment's entry points.
    pub workdir: PathBuf,
    pub local_hostname: Option<String>,
}

/// How an invocation finished.
#[derive(Debug)]
pub enum Report {
    /// `--dry-run`: the plan that would have been launched.
    Planned(CommandPlan),
    /// The child ran (or failed to start) and was classified.
    Completed(Outcome),
}

/// Resolve the mode and build the command, without side effects.
pub fn prepare(cli: &Cli, ctx: &RunContext) -> Result<(LaunchSpec, CommandPlan)> {
    let resolver = ConfiguredHosts::new(&ctx.env, &ctx.config);
    let resolution = mode::resolve(
        &cli.devices,
        &cli.hosts,
        &resolver,
        ctx.local_hostname.as_deref(),
    )?;

    let logs_root = ctx.workdir.join(&ctx.config.logs_root);
    let logs_dir = run_dir_path(&logs_root, &cli.experiment, Utc::now());

    let spec = LaunchSpec::new(
        cli.experiment.clone(),
        resolution,
        cli.controller_args.clone(),
        cli.worker_args.clone(),
        logs_dir,
    );

    let plan = build_plan(&spec, ctx)?;
    Ok((spec, plan))
}

fn build_plan(spec: &LaunchSpec, ctx: &RunContext) -> Result<CommandPlan> {
    let entry_points = DirEntryPoints::new(&ctx.workdir);
    plan::build(spec, &ctx.config, &ctx.env, &entry_points)
}

/// Run one invocation to completion.
///
/// Configuration problems come back as `Err` before anything is spawned;
/// everything after that is an [`Outcome`].
pub fn run(cli: &Cli, ctx: &RunContext) -> Result<Report> {
    let (mut spec, mut plan) = prepare(cli, ctx)?;

    if cli.dry_run {
        return Ok(Report::Planned(plan));
    }

    let logs_dir = create_run_dir(&spec.logs_dir)?;
    if logs_dir != spec.logs_dir {
        // Another run already holds this timestamp.
        spec.logs_dir = logs_dir;
        plan = build_plan(&spec, ctx)?;
    }
    LaunchManifest {
        experiment: &spec.experiment_name,
        mode: spec.mode,
        started_at: Utc::now(),
        hosts: &spec.hosts,
        devices: &spec.devices,
        command: &plan,
    }
    .write_to(&spec.logs_dir)?;

    tracing::info!(
        experiment = %spec.experiment_name,
        mode = %spec.mode,
        logs = %spec.logs_dir.display(),
        "launching"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LauncherError::Runtime(format!("failed to start runtime: {}", e)))?;

    runtime.block_on(launch_and_supervise(&plan, ctx))
}

async fn launch_and_supervise(plan: &CommandPlan, ctx: &RunContext) -> Result<Report> {
    // Registered before spawning so an early Ctrl-C is not lost.
    let listener = SignalListener::install().map_err(|e| {
        LauncherError::Runtime(format!("failed to install signal handlers: {}", e))
    })?;

    let child = match launch(plan, &ctx.env) {
        Ok(child) => child,
        Err(err) => return Ok(Report::Completed(Outcome::LaunchFailure(err))),
    };

    let supervisor = Supervisor::new(child, ctx.config.term_grace());
    let forwarder = listener.forward_to(supervisor.event_sender());
    let outcome = supervisor.run().await;
    forwarder.abort();

    Ok(Report::Completed(outcome))
}
