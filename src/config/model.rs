//! LauncherConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a launch.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    // =========================================================================
    // Programs
    // =========================================================================
    /// Interpreter that runs controller entry points (default: "python3").
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Distributed launch wrapper used in multi-node mode (default: "mpirun").
    #[serde(default = "default_mpi_launcher")]
    pub mpi_launcher: String,

    /// Controller used when no `<experiment>_controller` entry point exists.
    #[serde(default = "default_controller")]
    pub default_controller: String,

    /// Suffix appended to `<experiment>_worker` / `<experiment>_controller`.
    #[serde(default = "default_entry_point_suffix")]
    pub entry_point_suffix: String,

    // =========================================================================
    // Logs
    // =========================================================================
    /// Root under which per-run log directories are created.
    #[serde(default = "default_logs_root")]
    pub logs_root: String,

    /// File name prefix for per-host MPI output under the run directory.
    #[serde(default = "default_mpi_output_name")]
    pub mpi_output_name: String,

    // =========================================================================
    // Environment
    // =========================================================================
    /// Device-selection variable blanked for the MPI wrapper process.
    #[serde(default = "default_device_env_var")]
    pub device_env_var: String,

    // =========================================================================
    // Supervision
    // =========================================================================
    /// Seconds to wait after forwarding SIGTERM before sending SIGKILL.
    #[serde(default = "default_term_grace_seconds")]
    pub term_grace_seconds: u64,

    // =========================================================================
    // Hosts
    // =========================================================================
    /// Host list used when neither `--devices` nor `--hosts` is given and
    /// `TRAINLAUNCH_HOSTS` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            mpi_launcher: default_mpi_launcher(),
            default_controller: default_controller(),
            entry_point_suffix: default_entry_point_suffix(),
            logs_root: default_logs_root(),
            mpi_output_name: default_mpi_output_name(),
            device_env_var: default_device_env_var(),
            term_grace_seconds: default_term_grace_seconds(),
            hosts: None,
        }
    }
}
