//! Per-run log directory and launch manifest.

use crate::error::{LauncherError, Result};
use crate::mode::Mode;
use crate::plan::CommandPlan;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Manifest file written into every run directory.
pub const MANIFEST_FILE: &str = "launch.json";

const MAX_SUFFIX: u32 = 1000;

/// `<logs_root>/<experiment>/<YYYYmmdd-HHMMSS>` for a run started at `started_at`.
pub fn run_dir_path(logs_root: &Path, experiment: &str, started_at: DateTime<Utc>) -> PathBuf {
    logs_root
        .join(experiment)
        .join(started_at.format("%Y%m%d-%H%M%S").to_string())
}

/// Claim a fresh run directory at `path`, creating missing parents.
///
/// A run directory is never shared: when `path` already exists, `-1`, `-2`,
/// and so on are appended until an unused name is found. Returns the
/// directory actually created.
pub fn create_run_dir(path: &Path) -> Result<PathBuf> {
    let fail = |path: &Path, e: std::io::Error| {
        LauncherError::Configuration(format!(
            "failed to create logs directory '{}': {}",
            path.display(),
            e
        ))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| fail(parent, e))?;
    }

    let mut candidate = path.to_path_buf();
    for attempt in 1..=MAX_SUFFIX {
        match std::fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let mut name = path.as_os_str().to_os_string();
                name.push(format!("-{}", attempt));
                candidate = PathBuf::from(name);
            }
            Err(e) => return Err(fail(&candidate, e)),
        }
    }
    Err(LauncherError::Configuration(format!(
        "no free logs directory name left under '{}'",
        path.display()
    )))
}

/// What was launched, recorded next to the run's logs.
#[derive(Debug, Serialize)]
pub struct LaunchManifest<'a> {
    pub experiment: &'a str,
    pub mode: Mode,
    pub started_at: DateTime<Utc>,
    pub hosts: &'a [String],
    pub devices: &'a [String],
    pub command: &'a CommandPlan,
}

impl LaunchManifest<'_> {
    pub fn write_to(&self, run_dir: &Path) -> Result<PathBuf> {
        let path = run_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            LauncherError::Configuration(format!("failed to serialize launch manifest: {}", e))
        })?;

        std::fs::write(&path, json + "\n").map_err(|e| {
            LauncherError::Configuration(format!(
                "failed to write launch manifest '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(path)
    }
}
