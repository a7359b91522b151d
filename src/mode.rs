//! Single-node vs multi-node mode resolution.

use crate::error::{LauncherError, Result};
use crate::hosts::HostResolver;
use serde::Serialize;
use std::fmt;

/// Execution mode of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One controller process on the local machine.
    Single,
    /// An MPI wrapper starting one controller per host.
    Multi,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => write!(f, "single"),
            Mode::Multi => write!(f, "multi"),
        }
    }
}

/// Effective mode plus the device/host lists it was resolved from.
///
/// `hosts` has more than one entry iff `mode` is `Multi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub mode: Mode,
    pub devices: Vec<String>,
    pub hosts: Vec<String>,
}

/// Decide the execution mode.
///
/// Explicit devices win; explicit hosts come next; otherwise the external
/// host resolver is consulted. Supplying both devices and hosts, or a single
/// host that is not this machine, is a configuration error.
pub fn resolve(
    devices: &[String],
    hosts: &[String],
    resolver: &dyn HostResolver,
    local_hostname: Option<&str>,
) -> Result<Resolution> {
    if !devices.is_empty() && !hosts.is_empty() {
        return Err(LauncherError::Configuration(
            "--devices and --hosts are mutually exclusive".to_string(),
        ));
    }

    if !devices.is_empty() {
        return Ok(Resolution {
            mode: Mode::Single,
            devices: devices.to_vec(),
            hosts: Vec::new(),
        });
    }

    if !hosts.is_empty() {
        return from_hosts(hosts.to_vec(), local_hostname);
    }

    match resolver.resolve_hosts() {
        Some(resolved) if !resolved.is_empty() => from_hosts(resolved, local_hostname),
        _ => Ok(Resolution {
            mode: Mode::Single,
            devices: Vec::new(),
            hosts: Vec::new(),
        }),
    }
}

fn from_hosts(hosts: Vec<String>, local_hostname: Option<&str>) -> Result<Resolution> {
    if hosts.len() > 1 {
        return Ok(Resolution {
            mode: Mode::Multi,
            devices: Vec::new(),
            hosts,
        });
    }

    // A one-host run is only valid on that host itself.
    if local_hostname == Some(hosts[0].as_str()) {
        return Ok(Resolution {
            mode: Mode::Single,
            devices: Vec::new(),
            hosts,
        });
    }

    Err(LauncherError::Configuration(format!(
        "single host '{}' does not match this machine ({}); \
         run on that host directly or list more than one host",
        hosts[0],
        local_hostname.unwrap_or("unknown host")
    )))
}
