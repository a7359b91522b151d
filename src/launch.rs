//! Process launcher.
//!
//! Spawns exactly one child from a [`CommandPlan`] and hands back a
//! [`ChildHandle`] without waiting on it.

use crate::env::EnvSnapshot;
use crate::error::LaunchError;
use crate::plan::CommandPlan;
use nix::unistd::Pid;
use std::process::{Child, Command};

/// A spawned child process.
///
/// Owned by the supervisor from spawn until its status is collected.
#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
}

impl ChildHandle {
    pub fn pid(&self) -> Pid {
        Pid::from_raw(self.child.id() as i32)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Child {
        self.child
    }
}

/// Spawn the planned command.
///
/// The child environment is exactly `env` with `plan.env_overlay` applied on
/// top; nothing is inherited implicitly.
pub fn launch(plan: &CommandPlan, env: &EnvSnapshot) -> Result<ChildHandle, LaunchError> {
    let mut command = Command::new(&plan.program);
    command.args(&plan.args).env_clear();
    command.envs(env.iter());
    command.envs(&plan.env_overlay);

    let child = command.spawn().map_err(|e| {
        let err = LaunchError::from_spawn(&plan.program, e);
        tracing::error!(class = err.class(), error = %err, "failed to spawn child");
        err
    })?;

    tracing::info!(pid = child.id(), program = %plan.program, "spawned child");

    Ok(ChildHandle { child })
}
